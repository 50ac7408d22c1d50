use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cancellation scope for one probe.
///
/// Clones share the cancellation flag, so the blocking fetch can observe a
/// cancel issued by the async request handler.
#[derive(Clone, Debug)]
pub struct ProbeContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl ProbeContext {
    /// A deadline that overflows `Instant` leaves the context unbounded.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn deadline_elapsed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.deadline_elapsed()
    }

    /// Time left before the deadline, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns a guard that cancels this context when dropped.
    pub fn cancel_on_drop(&self) -> CancelGuard {
        CancelGuard {
            context: self.clone(),
        }
    }
}

#[must_use = "the context is cancelled as soon as the guard is dropped"]
pub struct CancelGuard {
    context: ProbeContext,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.context.cancel();
    }
}
