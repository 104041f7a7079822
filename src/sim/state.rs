//! Game state and core round/session types
//!
//! Everything the renderer can observe lives here; there is no hidden state
//! outside [`GameState`].

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timer::{TimerId, Timers};
use crate::consts::*;
use crate::rounded_percent;

/// Outcome of a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotResult {
    Goal,
    Save,
    Miss,
}

impl ShotResult {
    pub fn is_goal(self) -> bool {
        self == ShotResult::Goal
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShotResult::Goal => "goal",
            ShotResult::Save => "save",
            ShotResult::Miss => "miss",
        }
    }
}

/// Goalkeeper dive slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeeperSlot {
    Left,
    #[default]
    Center,
    Right,
}

impl KeeperSlot {
    pub const ALL: [KeeperSlot; 3] = [KeeperSlot::Left, KeeperSlot::Center, KeeperSlot::Right];

    /// Horizontal anchor in field coords
    pub fn anchor_x(self) -> f32 {
        match self {
            KeeperSlot::Left => KEEPER_LEFT_X,
            KeeperSlot::Center => GOAL_CENTER_X,
            KeeperSlot::Right => KEEPER_RIGHT_X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeeperSlot::Left => "left",
            KeeperSlot::Center => "center",
            KeeperSlot::Right => "right",
        }
    }
}

/// Default ball spot on the penalty mark
pub fn ball_rest() -> Vec2 {
    Vec2::new(BALL_REST_X, BALL_REST_Y)
}

/// A resolved shot. Fixed from release until the round resets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Power at release
    pub power: f32,
    pub result: ShotResult,
    pub keeper: KeeperSlot,
    /// Ball target in field coords
    pub ball: Vec2,
    /// Released by hitting max power rather than letting go
    pub auto: bool,
}

/// Round phase. Round-scoped values only exist in the variants that use them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Idle, ball on the spot, waiting for a press
    Waiting,
    /// Button held, charger running
    Charging { power: f32, ticker: TimerId },
    /// Ball in flight; `overlay` flips on after the first delay.
    /// `pending` is the next delay timer (overlay, then reset).
    Shooting {
        shot: Shot,
        overlay: bool,
        pending: TimerId,
    },
}

/// Flattened phase name for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Waiting,
    Charging,
    Shooting,
    /// Shooting with the result overlay visible
    Resolved,
}

impl PhaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Waiting => "waiting",
            PhaseKind::Charging => "charging",
            PhaseKind::Shooting => "shooting",
            PhaseKind::Resolved => "resolved",
        }
    }
}

/// Running score across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub attempts: u32,
    pub successes: u32,
    /// Consecutive goals
    pub streak: u32,
    pub best_streak: u32,
}

impl Session {
    /// Count a finished shot
    pub fn record(&mut self, result: ShotResult) {
        self.attempts += 1;
        if result.is_goal() {
            self.successes += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Rounded success percentage (0 with no attempts)
    pub fn success_rate(&self) -> u32 {
        rounded_percent(self.successes, self.attempts)
    }
}

/// Notifications for the host (sound cues, logging)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ChargeStarted,
    /// Charger stepped; `power` is the new value (the final step reads 100)
    PowerChanged { power: f32 },
    ShotTaken {
        result: ShotResult,
        power: f32,
        auto: bool,
    },
    OverlayShown { result: ShotResult },
    RoundReset,
    SessionCleared,
}

/// Undrained events kept at most
pub const MAX_EVENTS: usize = 64;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source for keeper dive and ball jitter
    pub rng: Pcg32,
    pub phase: Phase,
    pub session: Session,
    pub timers: Timers,
    events: VecDeque<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Waiting,
            session: Session::default(),
            timers: Timers::new(),
            events: VecDeque::new(),
        }
    }

    pub fn phase_kind(&self) -> PhaseKind {
        match self.phase {
            Phase::Waiting => PhaseKind::Waiting,
            Phase::Charging { .. } => PhaseKind::Charging,
            Phase::Shooting { overlay: false, .. } => PhaseKind::Shooting,
            Phase::Shooting { overlay: true, .. } => PhaseKind::Resolved,
        }
    }

    /// Current power (0 while waiting)
    pub fn power(&self) -> f32 {
        match self.phase {
            Phase::Waiting => 0.0,
            Phase::Charging { power, .. } => power,
            Phase::Shooting { shot, .. } => shot.power,
        }
    }

    pub fn shot(&self) -> Option<&Shot> {
        match &self.phase {
            Phase::Shooting { shot, .. } => Some(shot),
            _ => None,
        }
    }

    /// `None` until the shot is released
    pub fn result(&self) -> Option<ShotResult> {
        self.shot().map(|s| s.result)
    }

    pub fn keeper(&self) -> KeeperSlot {
        self.shot().map(|s| s.keeper).unwrap_or_default()
    }

    pub fn ball(&self) -> Vec2 {
        self.shot().map(|s| s.ball).unwrap_or_else(ball_rest)
    }

    pub fn overlay_visible(&self) -> bool {
        matches!(self.phase, Phase::Shooting { overlay: true, .. })
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> View {
        View {
            phase: self.phase_kind(),
            power: self.power().round() as u32,
            result: self.result(),
            keeper: self.keeper(),
            ball: self.ball(),
            overlay: self.overlay_visible(),
            attempts: self.session.attempts,
            successes: self.session.successes,
            success_rate: self.session.success_rate(),
            streak: self.session.streak,
            best_streak: self.session.best_streak,
        }
    }
}

/// Everything the renderer reads, in one serializable struct
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct View {
    pub phase: PhaseKind,
    /// Power rounded to an integer percent
    pub power: u32,
    pub result: Option<ShotResult>,
    pub keeper: KeeperSlot,
    pub ball: Vec2,
    pub overlay: bool,
    pub attempts: u32,
    pub successes: u32,
    pub success_rate: u32,
    pub streak: u32,
    pub best_streak: u32,
}
