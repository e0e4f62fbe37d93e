use std::time::Duration;

use super::scheduler::{TimerHandle, TimerQueue};

/// What a trigger did to the pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Nothing was pending; a new quiet period started.
    Scheduled(TimerHandle),
    /// A pending timer was cancelled and the quiet period restarted.
    Coalesced(TimerHandle),
}

impl Trigger {
    pub fn handle(self) -> TimerHandle {
        match self {
            Trigger::Scheduled(handle) | Trigger::Coalesced(handle) => handle,
        }
    }
}

/// Collapses bursts of triggers into one task that fires after a quiet period.
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<TimerHandle>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restart the quiet period, replacing any pending task.
    pub fn trigger<T>(&mut self, queue: &mut TimerQueue<T>, task: T) -> Trigger {
        let replaced = self
            .pending
            .take()
            .map(|handle| queue.cancel(handle))
            .unwrap_or(false);
        let handle = queue.schedule(self.quiet_period, task);
        self.pending = Some(handle);
        if replaced {
            Trigger::Coalesced(handle)
        } else {
            Trigger::Scheduled(handle)
        }
    }

    /// Drop the pending task without running it.
    pub fn cancel<T>(&mut self, queue: &mut TimerQueue<T>) -> bool {
        self.pending
            .take()
            .map(|handle| queue.cancel(handle))
            .unwrap_or(false)
    }

    /// Called when `handle` fires. Returns `true` if it is the task this
    /// debouncer is waiting on, so stale timers can be told apart.
    pub fn acknowledge(&mut self, handle: TimerHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
