//! Display-refresh frame requests
//!
//! [`FrameLoop`] is the render-aligned timer domain: owners request "call me on
//! the next frame", may cancel the request, and the host drains the due
//! requests once per refresh. Requests made while a frame is being processed
//! are only due on the following frame.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle for a pending next-frame request
    pub struct FrameRequestId;
}

/// Pending next-frame requests
#[derive(Debug, Default)]
pub struct FrameLoop {
    pending: SlotMap<FrameRequestId, ()>,
    frame_count: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for the next frame
    pub fn request(&mut self) -> FrameRequestId {
        self.pending.insert(())
    }

    /// Deregister a request. Returns false if it already fired or was canceled.
    pub fn cancel(&mut self, id: FrameRequestId) -> bool {
        self.pending.remove(id).is_some()
    }

    pub fn is_pending(&self, id: FrameRequestId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Start a frame: take every request due now.
    pub fn begin_frame(&mut self) -> SmallVec<[FrameRequestId; 4]> {
        self.frame_count += 1;
        let due: SmallVec<[FrameRequestId; 4]> = self.pending.keys().collect();
        self.pending.clear();
        due
    }

    /// Number of frames begun so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Drop every pending request (view teardown).
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_fires_once() {
        let mut frames = FrameLoop::new();
        let id = frames.request();
        assert!(frames.is_pending(id));

        let due = frames.begin_frame();
        assert_eq!(due.as_slice(), &[id]);
        assert!(!frames.is_pending(id));
        assert!(frames.begin_frame().is_empty());
        assert_eq!(frames.frame_count(), 2);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut frames = FrameLoop::new();
        let id = frames.request();
        assert!(frames.cancel(id));
        assert!(!frames.cancel(id));
        assert!(frames.begin_frame().is_empty());
    }

    #[test]
    fn test_new_request_never_reuses_old_handle() {
        let mut frames = FrameLoop::new();
        let old = frames.request();
        frames.cancel(old);
        let new = frames.request();
        assert_ne!(old, new);
        assert!(!frames.is_pending(old));
    }
}
