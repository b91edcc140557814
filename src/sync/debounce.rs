use std::time::{Duration, Instant};

/// A single coalescing timer slot.
///
/// Re-arming replaces the pending value and deadline wholesale: the last
/// call within the delay window wins, earlier values are dropped, nothing
/// queues.
#[derive(Debug)]
pub(crate) struct DebounceSlot<T> {
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Default for DebounceSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> DebounceSlot<T> {
    pub(crate) fn arm(&mut self, value: T, delay: Duration) {
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + delay,
        });
    }

    /// Takes the pending value if its deadline has passed.
    pub(crate) fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.deadline <= now) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Takes the pending value regardless of deadline.
    pub(crate) fn take(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub(crate) fn cancel(&mut self) {
        self.pending = None;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
