//! Round state machine
//!
//! waiting -> charging -> shooting -> (overlay) -> waiting
//!
//! Inputs are applied at the current clock; [`advance`] then runs every timer
//! that comes due in order, so a long frame still sees the same transitions
//! as many short ones.

use super::animate::animate;
use super::resolve::resolve;
use super::state::{GameEvent, GameState, Phase, Shot};
use super::timer::{Fired, TimerKind};
use crate::consts::*;

/// Input for a single host frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Press started (pointer down)
    pub press: bool,
    /// Press ended (pointer up / cancel)
    pub release: bool,
    /// Clear the session score and abort the round
    pub reset: bool,
}

/// Apply one frame of input, then advance the clock by `dt_ms`
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    if input.reset {
        reset_session(state);
    }
    if input.press {
        press_start(state);
    }
    if input.release {
        press_end(state);
    }
    advance(state, dt_ms);
}

/// Start charging. Ignored unless waiting. Returns whether it took effect.
pub fn press_start(state: &mut GameState) -> bool {
    if !matches!(state.phase, Phase::Waiting) {
        log::debug!("press ignored in {:?}", state.phase_kind());
        return false;
    }

    // Nothing from an earlier round may outlive it
    state.timers.cancel_all();
    let ticker = state
        .timers
        .schedule_repeating(TimerKind::ChargeTick, CHARGE_TICK_MS);
    state.phase = Phase::Charging { power: 0.0, ticker };
    state.push_event(GameEvent::ChargeStarted);
    true
}

/// Release the shot at the current power. Ignored unless charging.
pub fn press_end(state: &mut GameState) -> bool {
    match state.phase {
        Phase::Charging { power, .. } => {
            release_shot(state, power, false);
            true
        }
        _ => {
            log::debug!("release ignored in {:?}", state.phase_kind());
            false
        }
    }
}

/// Clear the score and force the round back to waiting, from any phase
pub fn reset_session(state: &mut GameState) {
    state.timers.cancel_all();
    state.phase = Phase::Waiting;
    state.session.clear();
    state.push_event(GameEvent::SessionCleared);
    log::info!("Session cleared");
}

/// Advance the clock by `dt_ms`, firing due timers in order
pub fn advance(state: &mut GameState, dt_ms: u64) {
    let until = state.timers.now_ms() + dt_ms;
    while let Some(fired) = state.timers.pop_due(until) {
        on_timer(state, fired);
    }
    state.timers.advance_to(until);
}

/// Timer callback. A timer whose phase has moved on, or whose handle is no
/// longer the one the phase holds, does nothing. Returns whether it applied.
pub fn on_timer(state: &mut GameState, fired: Fired) -> bool {
    match (fired.kind, state.phase) {
        (TimerKind::ChargeTick, Phase::Charging { power, ticker }) if ticker == fired.id => {
            let power = (power + POWER_STEP).min(MAX_POWER);
            state.push_event(GameEvent::PowerChanged { power });
            if power >= MAX_POWER {
                release_shot(state, MAX_POWER, true);
            } else {
                state.phase = Phase::Charging { power, ticker };
            }
            true
        }
        (
            TimerKind::ShowOverlay,
            Phase::Shooting {
                shot,
                overlay: false,
                pending,
            },
        ) if pending == fired.id => {
            let pending = state.timers.schedule(TimerKind::ResetRound, RESET_DELAY_MS);
            state.phase = Phase::Shooting {
                shot,
                overlay: true,
                pending,
            };
            state.push_event(GameEvent::OverlayShown {
                result: shot.result,
            });
            true
        }
        (
            TimerKind::ResetRound,
            Phase::Shooting {
                overlay: true,
                pending,
                ..
            },
        ) if pending == fired.id => {
            state.phase = Phase::Waiting;
            state.push_event(GameEvent::RoundReset);
            true
        }
        (kind, _) => {
            log::debug!(
                "stale {:?} timer ignored in {:?}",
                kind,
                state.phase_kind()
            );
            false
        }
    }
}

/// Charging -> shooting. The charger is cancelled before anything else so no
/// later tick can touch the power.
fn release_shot(state: &mut GameState, power: f32, auto: bool) {
    let Phase::Charging { ticker, .. } = state.phase else {
        return;
    };
    state.timers.cancel(ticker);

    let result = resolve(power);
    let (keeper, ball) = animate(result, &mut state.rng);
    state.session.record(result);

    let pending = state.timers.schedule(TimerKind::ShowOverlay, OVERLAY_DELAY_MS);
    state.phase = Phase::Shooting {
        shot: Shot {
            power,
            result,
            keeper,
            ball,
            auto,
        },
        overlay: false,
        pending,
    };
    state.push_event(GameEvent::ShotTaken {
        result,
        power,
        auto,
    });

    log::info!(
        "Shot at {:.0}% -> {} (keeper {}, {}/{})",
        power,
        result.as_str(),
        keeper.as_str(),
        state.session.successes,
        state.session.attempts
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{KeeperSlot, PhaseKind, ShotResult};
    use glam::Vec2;
    use proptest::prelude::*;

    /// Hold until the charger reaches `target` (must be reachable in steps of 2)
    fn charge_to(state: &mut GameState, target: f32) {
        let ticks = (target / POWER_STEP) as u64;
        advance(state, ticks * CHARGE_TICK_MS);
        assert_eq!(state.power(), target);
    }

    fn finish_round(state: &mut GameState) {
        advance(state, OVERLAY_DELAY_MS + RESET_DELAY_MS);
        assert_eq!(state.phase_kind(), PhaseKind::Waiting);
    }

    #[test]
    fn test_press_starts_charging() {
        let mut state = GameState::new(1);
        assert!(press_start(&mut state));
        assert_eq!(state.phase_kind(), PhaseKind::Charging);
        assert_eq!(state.power(), 0.0);
        assert_eq!(state.result(), None);
        assert!(!state.overlay_visible());
        assert_eq!(state.drain_events(), vec![GameEvent::ChargeStarted]);
    }

    #[test]
    fn test_power_steps_every_period() {
        let mut state = GameState::new(1);
        press_start(&mut state);

        state.drain_events();

        advance(&mut state, 49);
        assert_eq!(state.power(), 0.0);
        assert!(state.drain_events().is_empty());

        advance(&mut state, 1);
        assert_eq!(state.power(), 2.0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PowerChanged { power: 2.0 }]
        );

        advance(&mut state, 500);
        assert_eq!(state.power(), 22.0);
        let steps: Vec<f32> = state
            .drain_events()
            .into_iter()
            .map(|e| match e {
                GameEvent::PowerChanged { power } => power,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(steps, (2..=11).map(|i| i as f32 * 2.0).collect::<Vec<_>>());
    }

    #[test]
    fn test_final_step_reported_before_shot() {
        let mut state = GameState::new(1);
        press_start(&mut state);
        advance(&mut state, 49 * CHARGE_TICK_MS);
        state.drain_events();

        advance(&mut state, CHARGE_TICK_MS);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::PowerChanged { power: 100.0 });
        assert!(matches!(
            events[1],
            GameEvent::ShotTaken {
                result: ShotResult::Miss,
                auto: true,
                ..
            }
        ));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_auto_release_at_max_power() {
        // Scenario A: hold without letting go
        let mut state = GameState::new(1);
        press_start(&mut state);

        advance(&mut state, 49 * CHARGE_TICK_MS);
        assert_eq!(state.phase_kind(), PhaseKind::Charging);
        assert_eq!(state.power(), 98.0);

        advance(&mut state, CHARGE_TICK_MS);
        assert_eq!(state.phase_kind(), PhaseKind::Shooting);
        assert_eq!(state.power(), 100.0);
        assert_eq!(state.result(), Some(ShotResult::Miss));
        assert!(state.shot().unwrap().auto);
        assert_eq!(state.session.attempts, 1);
        assert_eq!(state.session.successes, 0);

        // Power never creeps past the cap
        advance(&mut state, 10 * CHARGE_TICK_MS);
        assert_eq!(state.power(), 100.0);
    }

    #[test]
    fn test_release_in_zone_scores() {
        // Scenario B
        let mut state = GameState::new(1);
        press_start(&mut state);
        charge_to(&mut state, 74.0);
        if let Phase::Charging { power, .. } = &mut state.phase {
            *power = 75.0;
        }
        assert!(press_end(&mut state));

        assert_eq!(state.result(), Some(ShotResult::Goal));
        assert_eq!(state.power(), 75.0);
        assert_eq!(state.session.attempts, 1);
        assert_eq!(state.session.successes, 1);
    }

    #[test]
    fn test_goal_then_miss() {
        // Scenario C
        let mut state = GameState::new(5);

        press_start(&mut state);
        charge_to(&mut state, 76.0);
        press_end(&mut state);
        assert_eq!(state.result(), Some(ShotResult::Goal));
        finish_round(&mut state);

        press_start(&mut state);
        charge_to(&mut state, 90.0);
        press_end(&mut state);
        assert_eq!(state.result(), Some(ShotResult::Miss));
        finish_round(&mut state);

        assert_eq!(state.session.attempts, 2);
        assert_eq!(state.session.successes, 1);
        assert_eq!(state.session.success_rate(), 50);
    }

    #[test]
    fn test_release_before_first_tick_is_saved() {
        // Scenario D
        let mut state = GameState::new(1);
        press_start(&mut state);
        advance(&mut state, 10);
        press_end(&mut state);
        assert_eq!(state.power(), 0.0);
        assert_eq!(state.result(), Some(ShotResult::Save));
    }

    #[test]
    fn test_press_and_release_same_frame() {
        let mut state = GameState::new(1);
        let input = TickInput {
            press: true,
            release: true,
            ..Default::default()
        };
        tick(&mut state, &input, 16);
        assert_eq!(state.result(), Some(ShotResult::Save));
    }

    #[test]
    fn test_no_power_change_after_release() {
        let mut state = GameState::new(1);
        press_start(&mut state);
        charge_to(&mut state, 40.0);

        let Phase::Charging { ticker, .. } = state.phase else {
            panic!("expected charging");
        };
        // A tick that was already due when the release landed
        let late_tick = Fired {
            id: ticker,
            kind: TimerKind::ChargeTick,
            at_ms: state.timers.now_ms() + CHARGE_TICK_MS,
        };

        press_end(&mut state);
        assert!(!state.timers.is_pending(ticker));
        assert!(!on_timer(&mut state, late_tick));
        assert_eq!(state.power(), 40.0);

        advance(&mut state, 500);
        assert_eq!(state.power(), 40.0);
    }

    #[test]
    fn test_stale_ticker_cannot_touch_next_round() {
        let mut state = GameState::new(1);
        press_start(&mut state);
        let Phase::Charging { ticker: old, .. } = state.phase else {
            panic!("expected charging");
        };
        press_end(&mut state);
        finish_round(&mut state);

        press_start(&mut state);
        let stale = Fired {
            id: old,
            kind: TimerKind::ChargeTick,
            at_ms: state.timers.now_ms(),
        };
        assert!(!on_timer(&mut state, stale));
        assert_eq!(state.power(), 0.0);
    }

    #[test]
    fn test_overlay_then_reset_timing() {
        let mut state = GameState::new(1);
        press_start(&mut state);
        press_end(&mut state);
        state.drain_events();

        advance(&mut state, OVERLAY_DELAY_MS - 1);
        assert_eq!(state.phase_kind(), PhaseKind::Shooting);
        assert!(!state.overlay_visible());

        advance(&mut state, 1);
        assert_eq!(state.phase_kind(), PhaseKind::Resolved);
        assert!(state.overlay_visible());
        let result = state.result();

        advance(&mut state, RESET_DELAY_MS - 1);
        assert_eq!(state.phase_kind(), PhaseKind::Resolved);
        assert_eq!(state.result(), result);

        advance(&mut state, 1);
        assert_eq!(state.phase_kind(), PhaseKind::Waiting);
        assert_eq!(state.power(), 0.0);
        assert_eq!(state.result(), None);
        assert!(!state.overlay_visible());
        assert_eq!(state.ball(), Vec2::new(50.0, 85.0));
        assert_eq!(state.keeper(), KeeperSlot::Center);
        assert!(state.timers.is_empty());

        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::OverlayShown {
                    result: ShotResult::Save
                },
                GameEvent::RoundReset
            ]
        );
    }

    #[test]
    fn test_long_frame_fires_in_order() {
        // One huge frame: auto-release at 2500ms, overlay at 3500, reset at 5500
        let mut state = GameState::new(1);
        press_start(&mut state);
        advance(&mut state, 5499);
        assert_eq!(state.phase_kind(), PhaseKind::Resolved);
        advance(&mut state, 1);
        assert_eq!(state.phase_kind(), PhaseKind::Waiting);
        assert_eq!(state.session.attempts, 1);
    }

    #[test]
    fn test_inputs_ignored_out_of_phase() {
        let mut state = GameState::new(1);
        assert!(!press_end(&mut state));
        assert_eq!(state.session.attempts, 0);

        press_start(&mut state);
        assert!(!press_start(&mut state));

        press_end(&mut state);
        let shot = *state.shot().unwrap();
        assert!(!press_start(&mut state));
        assert!(!press_end(&mut state));
        assert_eq!(state.shot(), Some(&shot));
        assert_eq!(state.session.attempts, 1);
    }

    #[test]
    fn test_reset_mid_charge() {
        let mut state = GameState::new(1);
        press_start(&mut state);
        charge_to(&mut state, 30.0);

        reset_session(&mut state);
        assert_eq!(state.phase_kind(), PhaseKind::Waiting);
        assert_eq!(state.power(), 0.0);
        assert!(state.timers.is_empty());

        advance(&mut state, 10_000);
        assert_eq!(state.phase_kind(), PhaseKind::Waiting);
        assert_eq!(state.session.attempts, 0);
    }

    #[test]
    fn test_reset_mid_shot_cancels_delays() {
        let mut state = GameState::new(1);
        press_start(&mut state);
        press_end(&mut state);
        advance(&mut state, OVERLAY_DELAY_MS);
        assert!(state.overlay_visible());
        let Phase::Shooting { pending, .. } = state.phase else {
            panic!("expected shooting");
        };

        reset_session(&mut state);
        assert_eq!(state.session.attempts, 0);
        assert_eq!(state.phase_kind(), PhaseKind::Waiting);

        // Start a new round; the old reset timer must not end it early
        press_start(&mut state);
        let stale = Fired {
            id: pending,
            kind: TimerKind::ResetRound,
            at_ms: state.timers.now_ms(),
        };
        assert!(!on_timer(&mut state, stale));
        assert_eq!(state.phase_kind(), PhaseKind::Charging);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = GameState::new(1);
        press_start(&mut state);
        press_end(&mut state);

        reset_session(&mut state);
        let once = state.view();
        reset_session(&mut state);
        assert_eq!(state.view(), once);
        assert_eq!(once.attempts, 0);
        assert_eq!(once.successes, 0);
    }

    #[test]
    fn test_reset_via_tick_input() {
        let mut state = GameState::new(1);
        press_start(&mut state);
        let input = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &input, 100);
        assert_eq!(state.phase_kind(), PhaseKind::Waiting);
    }

    #[test]
    fn test_same_seed_same_session() {
        let play = |seed| {
            let mut state = GameState::new(seed);
            let mut shots = Vec::new();
            for hold in [10u64, 30, 38, 45] {
                press_start(&mut state);
                advance(&mut state, hold * CHARGE_TICK_MS);
                press_end(&mut state);
                shots.push(*state.shot().unwrap());
                advance(&mut state, OVERLAY_DELAY_MS + RESET_DELAY_MS);
            }
            shots
        };
        assert_eq!(play(77), play(77));
    }

    proptest! {
        #[test]
        fn prop_successes_never_exceed_attempts(
            holds in proptest::collection::vec((0u64..3000, any::<bool>()), 1..20),
            seed in any::<u64>(),
        ) {
            let mut state = GameState::new(seed);
            for (hold_ms, reset) in holds {
                press_start(&mut state);
                advance(&mut state, hold_ms);
                press_end(&mut state);
                if reset {
                    reset_session(&mut state);
                }
                advance(&mut state, OVERLAY_DELAY_MS + RESET_DELAY_MS);
                prop_assert!(state.session.successes <= state.session.attempts);
                prop_assert_eq!(state.phase_kind(), PhaseKind::Waiting);
                prop_assert!(state.power() <= MAX_POWER);
            }
        }
    }
}
