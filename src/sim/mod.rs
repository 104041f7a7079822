//! Penalty round simulation
//!
//! All gameplay logic lives here. This module must stay pure and host-driven:
//! - Time only moves when the host advances the clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod animate;
pub mod resolve;
pub mod state;
pub mod tick;
pub mod timer;

pub use animate::{animate, ball_target, pick_keeper};
pub use resolve::resolve;
pub use state::{
    GameEvent, GameState, KeeperSlot, MAX_EVENTS, Phase, PhaseKind, Session, Shot, ShotResult,
    View, ball_rest,
};
pub use tick::{TickInput, advance, on_timer, press_end, press_start, reset_session, tick};
pub use timer::{Fired, TimerId, TimerKind, Timers};
