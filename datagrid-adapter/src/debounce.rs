/// A cancellable scheduled action, driven by the adapter's clock.
///
/// Each [`Debouncer::schedule`] replaces any pending value and restarts the delay, so the value
/// fires only after `delay_ms` without further calls. Nothing runs on its own: the adapter calls
/// [`Debouncer::poll`] from its timer/frame tick, and [`Debouncer::cancel`] on teardown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<Scheduled<T>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Scheduled<T> {
    value: T,
    due_ms: u64,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value fires, if any.
    pub fn due_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// Cancels any pending value and schedules `value` to fire at `now_ms + delay_ms`.
    pub fn schedule(&mut self, value: T, now_ms: u64) {
        self.pending = Some(Scheduled {
            value,
            due_ms: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// Returns the pending value once it is due.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let due = self.pending.as_ref()?.due_ms;
        if now_ms < due {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}
