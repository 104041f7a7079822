//! Idle/demo mode - a bot takes the penalties
//!
//! The bot has its own RNG so watching it play does not disturb the game's
//! seeded stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{GameState, Phase, TickInput};

/// Lowest release target the bot picks
pub const MIN_TARGET: f32 = 50.0;
/// Highest target; anything past max power means "hold until it fires"
pub const MAX_TARGET: f32 = 110.0;

/// Demo player
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    /// Release target for the round being charged
    target: Option<f32>,
}

impl AutoPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            target: None,
        }
    }

    /// Current release target, if charging
    pub fn target(&self) -> Option<f32> {
        self.target
    }

    /// Decide this frame's input
    pub fn input(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        match state.phase {
            Phase::Waiting => {
                let target = self.rng.random_range(MIN_TARGET..MAX_TARGET);
                log::debug!("autoplay aiming for {:.0}%", target);
                self.target = Some(target);
                input.press = true;
            }
            Phase::Charging { power, .. } => {
                if self.target.is_some_and(|t| power >= t) {
                    input.release = true;
                    self.target = None;
                }
            }
            Phase::Shooting { .. } => self.target = None,
        }
        input
    }

    /// This frame's input with the player's own input folded in. The bot owns
    /// press and release; a reset from the player always goes through.
    pub fn input_with(&mut self, state: &GameState, user: &TickInput) -> TickInput {
        let mut input = self.input(state);
        input.reset |= user.reset;
        input
    }
}
