//! Keeper dive and ball flight targets
//!
//! Purely cosmetic. The keeper's dive is drawn independently of the outcome,
//! so a "save" can show the keeper diving the other way.

use glam::Vec2;
use rand::Rng;

use super::state::{KeeperSlot, ShotResult};
use crate::consts::*;

/// Uniformly pick a dive slot
pub fn pick_keeper<R: Rng + ?Sized>(rng: &mut R) -> KeeperSlot {
    KeeperSlot::ALL[rng.random_range(0..KeeperSlot::ALL.len())]
}

/// Where the ball ends up for a given outcome
pub fn ball_target<R: Rng + ?Sized>(result: ShotResult, keeper: KeeperSlot, rng: &mut R) -> Vec2 {
    let (center_x, jitter, y) = match result {
        ShotResult::Goal => (GOAL_CENTER_X, GOAL_JITTER, GOAL_Y),
        ShotResult::Save => (keeper.anchor_x(), SAVE_JITTER, SAVE_Y),
        ShotResult::Miss => (GOAL_CENTER_X, MISS_JITTER, MISS_Y),
    };
    let x = center_x + rng.random_range(-jitter..=jitter);
    Vec2::new(x.clamp(0.0, 100.0), y)
}

/// Keeper first, then ball (the save target depends on the dive)
pub fn animate<R: Rng + ?Sized>(result: ShotResult, rng: &mut R) -> (KeeperSlot, Vec2) {
    let keeper = pick_keeper(rng);
    let ball = ball_target(result, keeper, rng);
    (keeper, ball)
}
