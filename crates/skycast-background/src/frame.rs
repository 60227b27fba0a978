//! Frame loop bookkeeping with synchronous cancellation.
//!
//! Every started loop is stamped with a generation number. Cancelling bumps
//! the generation, which turns every outstanding [`FrameRequest`] stale; a
//! stale request never runs its frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A pending per-frame continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    generation: u64,
}

impl FrameRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Generation counter shared between the engine and its cancel handles.
#[derive(Debug, Default)]
pub struct FrameLoop {
    generation: Arc<AtomicU64>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate outstanding requests and start a new loop.
    pub fn start(&self) -> FrameRequest {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        FrameRequest { generation }
    }

    /// Invalidate every outstanding request.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether `request` belongs to the loop that is currently running.
    pub fn is_live(&self, request: FrameRequest) -> bool {
        self.generation.load(Ordering::SeqCst) == request.generation
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            generation: Arc::clone(&self.generation),
        }
    }
}

/// Cancels the frame loop it was taken from, from anywhere.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    generation: Arc<AtomicU64>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
