#![forbid(unsafe_code)]

//! Orchestration identity and cancellation.
//!
//! Every orchestration gets a fresh [`OrchestrationId`] from a monotonically
//! increasing generation counter, so a handle outliving its orchestration is
//! recognised as stale instead of aliasing a newer one.
//!
//! [`OrchestrationHandle`] is a cloneable view of one orchestration's
//! lifecycle. [`cancel`](OrchestrationHandle::cancel) only sets a flag; the
//! choreographer observes it before its next tick or its next start, and
//! from then on the orchestration writes nothing.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Generation-stamped orchestration identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrchestrationId(u64);

impl OrchestrationId {
    #[inline]
    #[must_use]
    pub const fn new(generation: u64) -> Self {
        Self(generation)
    }

    #[inline]
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrchestrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "orchestration#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct HandleState {
    cancelled: AtomicBool,
    finished: AtomicBool,
}

/// Caller-side view of a running orchestration.
#[derive(Debug, Clone)]
pub struct OrchestrationHandle {
    id: OrchestrationId,
    state: Arc<HandleState>,
}

impl OrchestrationHandle {
    pub(crate) fn new(id: OrchestrationId) -> Self {
        Self {
            id,
            state: Arc::new(HandleState::default()),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> OrchestrationId {
        self.id
    }

    /// Request cancellation. Idempotent; a no-op once finished.
    pub fn cancel(&self) {
        if !self.is_finished() {
            self.state.cancelled.store(true, Ordering::Release);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// The orchestration has reported its completion.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.finished.load(Ordering::Acquire)
    }

    /// Still ticking: neither finished nor asked to stop.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_finished() && !self.is_cancelled()
    }

    pub(crate) fn mark_finished(&self) {
        self.state.finished.store(true, Ordering::Release);
    }
}
