//! Per-control timer registry.
//!
//! Timers here are not background tasks: they are deadlines checked against a
//! [`Clock`](crate::Clock) whenever the dispatcher advances. Cancelling a timer
//! removes its entry, so nothing can fire after [`TimerRegistry::cancel_all`].

use std::time::Duration;

use tracing::debug;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Revert the correct/error icon after the reset delay.
    IconReset,
    /// Recompute floating positions.
    PositionRefresh,
}

#[derive(Debug, Clone)]
struct ScheduledTimer {
    kind: TimerKind,
    deadline: Duration,
    /// `Some` for repeating timers.
    period: Option<Duration>,
}

/// Pending timers of one control. At most one entry per [`TimerKind`].
#[derive(Debug, Default)]
pub struct TimerRegistry {
    entries: Vec<ScheduledTimer>,
    fire_count: u64,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer, replacing any pending timer of the same kind.
    pub fn once(&mut self, kind: TimerKind, now: Duration, delay: Duration) {
        self.insert(ScheduledTimer {
            kind,
            deadline: now + delay,
            period: None,
        });
    }

    /// Schedule a repeating timer, replacing any pending timer of the same kind.
    pub fn repeating(&mut self, kind: TimerKind, now: Duration, period: Duration) {
        self.insert(ScheduledTimer {
            kind,
            deadline: now + period,
            period: Some(period),
        });
    }

    fn insert(&mut self, timer: ScheduledTimer) {
        self.entries.retain(|t| t.kind != timer.kind);
        debug!("Timer {:?} scheduled for {:?}", timer.kind, timer.deadline);
        self.entries.push(timer);
    }

    /// Cancel the timer of `kind`. Returns whether one was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t.kind != kind);
        let cancelled = self.entries.len() != before;
        if cancelled {
            debug!("Timer {:?} cancelled", kind);
        }
        cancelled
    }

    /// Cancel every pending timer. Returns how many were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.entries.iter().any(|t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of timer firings so far.
    pub fn fire_count(&self) -> u64 {
        self.fire_count
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|t| t.deadline).min()
    }

    /// Remove and return the timers due at `now`, earliest first.
    ///
    /// Repeating timers are re-armed one period after `now`; a late tick
    /// fires once instead of catching up on missed periods.
    pub fn take_due(&mut self, now: Duration) -> Vec<TimerKind> {
        let mut due: Vec<(Duration, TimerKind)> = Vec::new();

        self.entries.retain_mut(|timer| {
            if timer.deadline > now {
                return true;
            }
            due.push((timer.deadline, timer.kind));
            match timer.period {
                Some(period) => {
                    timer.deadline = now + period;
                    true
                }
                None => false,
            }
        });

        due.sort_by_key(|(deadline, _)| *deadline);
        self.fire_count += due.len() as u64;
        due.into_iter().map(|(_, kind)| kind).collect()
    }
}
