//! Deterministic timer service
//!
//! Every delay in the engine goes through [`Timers`] so tests can drive a
//! virtual clock tick by tick. There is no wall-clock read anywhere in the
//! core: the session advances the service from its own `tick(delta_ms)`.

/// Opaque handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct TimerEntry {
    handle: TimerHandle,
    deadline_ms: f64,
}

/// Tick-driven timer registry
///
/// `schedule` returns a handle, `advance` moves the clock and returns every
/// handle whose deadline elapsed, in deadline order. Fired and canceled
/// handles are forgotten; a handle never fires twice.
#[derive(Debug, Default)]
pub struct Timers {
    now_ms: f64,
    next_id: u64,
    pending: Vec<TimerEntry>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the virtual clock
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Schedule a timer `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(TimerEntry {
            handle,
            deadline_ms: self.now_ms + delay_ms.max(0.0),
        });
        handle
    }

    /// Cancel a pending timer; returns false if it already fired or was
    /// canceled before
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|e| e.handle != handle);
        self.pending.len() != before
    }

    /// Is this handle still waiting to fire?
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|e| e.handle == handle)
    }

    /// Advance the clock, returning fired handles in deadline order
    pub fn advance(&mut self, delta_ms: f64) -> Vec<TimerHandle> {
        self.now_ms += delta_ms.max(0.0);
        let now = self.now_ms;

        let mut fired: Vec<TimerEntry> = Vec::new();
        self.pending.retain(|e| {
            if e.deadline_ms <= now {
                fired.push(e.clone());
                false
            } else {
                true
            }
        });

        fired.sort_by(|a, b| {
            a.deadline_ms
                .partial_cmp(&b.deadline_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        fired.into_iter().map(|e| e.handle).collect()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of timers still pending
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
