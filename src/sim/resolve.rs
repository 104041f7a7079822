//! Shot outcome from release power

use super::state::ShotResult;
use crate::consts::{PERFECT_ZONE_MAX, PERFECT_ZONE_MIN};

/// Map release power to an outcome. Pure; nothing but power matters.
///
/// - inside the perfect zone (bounds inclusive): goal
/// - under it: the keeper gets to it
/// - over it: over the bar
pub fn resolve(power: f32) -> ShotResult {
    if power < PERFECT_ZONE_MIN {
        ShotResult::Save
    } else if power > PERFECT_ZONE_MAX {
        ShotResult::Miss
    } else {
        ShotResult::Goal
    }
}
