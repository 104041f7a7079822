//! Cooperative timers on a host-driven millisecond clock
//!
//! Nothing fires on its own: the host advances the clock and pulls due
//! timers one at a time with [`Timers::pop_due`], so every callback runs
//! against the state left behind by the previous one.

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Power charger tick (repeating)
    ChargeTick,
    /// Show the result overlay
    ShowOverlay,
    /// Return to waiting after the overlay
    ResetRound,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    /// Clock value the timer was due at
    pub at_ms: u64,
}

#[derive(Debug, Clone)]
struct Pending {
    id: TimerId,
    kind: TimerKind,
    due_ms: u64,
    period_ms: Option<u64>,
}

/// Timer queue (kept small: at most one charge ticker and one delay at a time)
#[derive(Debug, Clone, Default)]
pub struct Timers {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value (ms)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn alloc_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    /// Schedule a one-shot timer `delay_ms` from now
    pub fn schedule(&mut self, kind: TimerKind, delay_ms: u64) -> TimerId {
        let id = self.alloc_id();
        self.pending.push(Pending {
            id,
            kind,
            due_ms: self.now_ms + delay_ms,
            period_ms: None,
        });
        id
    }

    /// Schedule a timer that fires every `period_ms` until cancelled
    pub fn schedule_repeating(&mut self, kind: TimerKind, period_ms: u64) -> TimerId {
        let id = self.alloc_id();
        let period_ms = period_ms.max(1);
        self.pending.push(Pending {
            id,
            kind,
            due_ms: self.now_ms + period_ms,
            period_ms: Some(period_ms),
        });
        id
    }

    /// Cancel a timer. Returns false if it was not pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel everything
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time. Repeating timers are re-armed one period later.
    /// Ties are broken by id (scheduling order).
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.id))
            .map(|(i, _)| i)?;

        let fired = {
            let p = &self.pending[idx];
            Fired {
                id: p.id,
                kind: p.kind,
                at_ms: p.due_ms,
            }
        };
        self.now_ms = self.now_ms.max(fired.at_ms);

        match self.pending[idx].period_ms {
            Some(period) => self.pending[idx].due_ms += period,
            None => {
                self.pending.swap_remove(idx);
            }
        }

        Some(fired)
    }

    /// Move the clock forward without firing anything.
    /// Callers drain [`Timers::pop_due`] up to `until_ms` first.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
