//! Penalty Shot - a hold-to-charge penalty kick mini-game
//!
//! Core modules:
//! - `sim`: Round state machine, power charger, outcome resolver, session score
//! - `autoplay`: Idle/demo player that drives the sim with synthetic input
//! - `audio`: Sound cues for game events (Web Audio playback on wasm)
//! - `settings`: Presentation preferences

pub mod audio;
pub mod autoplay;
pub mod settings;
pub mod sim;

pub use autoplay::AutoPlayer;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Charge ticker period (ms)
    pub const CHARGE_TICK_MS: u64 = 50;
    /// Power added per charge tick
    pub const POWER_STEP: f32 = 2.0;
    /// Power ceiling; reaching it auto-releases the shot
    pub const MAX_POWER: f32 = 100.0;

    /// Perfect zone bounds (inclusive)
    pub const PERFECT_ZONE_MIN: f32 = 70.0;
    pub const PERFECT_ZONE_MAX: f32 = 85.0;

    /// Delay from release until the result overlay shows (ms)
    pub const OVERLAY_DELAY_MS: u64 = 1000;
    /// Delay from overlay until the round resets (ms)
    pub const RESET_DELAY_MS: u64 = 2000;

    /// Ball resting spot on the penalty mark (normalized field coords)
    pub const BALL_REST_X: f32 = 50.0;
    pub const BALL_REST_Y: f32 = 85.0;

    /// Ball target rows per outcome
    pub const GOAL_Y: f32 = 40.0;
    pub const SAVE_Y: f32 = 45.0;
    pub const MISS_Y: f32 = 10.0;

    /// Horizontal jitter half-widths per outcome
    pub const GOAL_JITTER: f32 = 15.0;
    pub const SAVE_JITTER: f32 = 5.0;
    pub const MISS_JITTER: f32 = 20.0;

    /// Goal center and keeper dive anchors (x)
    pub const GOAL_CENTER_X: f32 = 50.0;
    pub const KEEPER_LEFT_X: f32 = 25.0;
    pub const KEEPER_RIGHT_X: f32 = 75.0;
}

/// Success percentage rounded to the nearest integer (0 when nothing attempted)
#[inline]
pub fn rounded_percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u32
}
