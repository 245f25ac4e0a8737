//! Host animation-frame source.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Why a frame callback was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePurpose {
    /// Paint the most recently resolved scene.
    Redraw,
    /// Advance playback.
    Tick,
}

/// Requests one-shot callbacks on the host's next animation frame.
pub trait FrameScheduler {
    fn request(&mut self, purpose: FramePurpose) -> FrameHandle;
    /// Cancel a pending request. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);
}

/// FIFO scheduler for hosts without their own frame loop (and tests).
/// The host calls [`QueuedScheduler::take_due`] once per frame and dispatches
/// every returned request.
#[derive(Debug, Default)]
pub struct QueuedScheduler {
    next: u64,
    queue: VecDeque<(FrameHandle, FramePurpose)>,
    cancelled: usize,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.queue.iter().any(|(h, _)| *h == handle)
    }

    pub fn pending_for(&self, purpose: FramePurpose) -> usize {
        self.queue.iter().filter(|(_, p)| *p == purpose).count()
    }

    /// Number of requests cancelled before they fired.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Requests due this frame. Requests made while dispatching them land in
    /// the next frame.
    pub fn take_due(&mut self) -> Vec<(FrameHandle, FramePurpose)> {
        self.queue.drain(..).collect()
    }
}

impl FrameScheduler for QueuedScheduler {
    fn request(&mut self, purpose: FramePurpose) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.queue.push_back((handle, purpose));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        let before = self.queue.len();
        self.queue.retain(|(h, _)| *h != handle);
        self.cancelled += before - self.queue.len();
    }
}
