// nt_faultdump/src/fault/infrastructure/frame_store.rs

//! # Exception Frame Store
//!
//! Owns the single exception frame of a [`FaultSystem`](super::di::container::FaultSystem)
//! and enforces its lifecycle: uninitialized until the first trap, rewritten
//! by every trap, frozen once the handler halts.

use crate::fault::ds::{ExceptionFrame, FaultError, FrameLifecycle};
use core::sync::atomic::{AtomicBool, Ordering};
use spin::Mutex;

pub struct FrameStore {
    frame: Mutex<ExceptionFrame>,
    captured: AtomicBool,
    frozen: AtomicBool,
}

impl FrameStore {
    pub const fn new() -> Self {
        Self {
            frame: Mutex::new(ExceptionFrame::new()),
            captured: AtomicBool::new(false),
            frozen: AtomicBool::new(false),
        }
    }

    pub fn lifecycle(&self) -> FrameLifecycle {
        if self.frozen.load(Ordering::Acquire) {
            FrameLifecycle::Frozen
        } else if self.captured.load(Ordering::Acquire) {
            FrameLifecycle::Captured
        } else {
            FrameLifecycle::Uninitialized
        }
    }

    /// Lets `fill` write the frame in place, then marks it captured.
    ///
    /// `fill` sees the previous contents; it is expected to overwrite every
    /// field.
    pub fn capture_with<F>(&self, fill: F) -> Result<(), FaultError>
    where
        F: FnOnce(&mut ExceptionFrame),
    {
        if self.frozen.load(Ordering::Acquire) {
            return Err(FaultError::FrameFrozen);
        }
        let mut frame = self.frame.lock();
        fill(&mut frame);
        self.captured.store(true, Ordering::Release);
        Ok(())
    }

    /// Runs `f` on the captured frame. `None` if no trap was ever captured,
    /// even once frozen.
    pub fn with<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&ExceptionFrame) -> R,
    {
        if !self.captured.load(Ordering::Acquire) {
            return None;
        }
        let frame = self.frame.lock();
        Some(f(&frame))
    }

    pub fn snapshot(&self) -> Option<ExceptionFrame> {
        self.with(|frame| *frame)
    }

    /// Freezes the frame. Irreversible.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_frame() {
        let store = FrameStore::new();
        assert_eq!(store.lifecycle(), FrameLifecycle::Uninitialized);
        assert_eq!(store.snapshot(), None);
    }

    #[test]
    fn each_capture_overwrites_the_previous_one() {
        let store = FrameStore::new();
        store.capture_with(|f| f.pc = 1).unwrap();
        store.capture_with(|f| f.pc = 2).unwrap();
        assert_eq!(store.lifecycle(), FrameLifecycle::Captured);
        assert_eq!(store.with(|f| f.pc), Some(2));
    }

    #[test]
    fn frozen_frame_refuses_capture() {
        let store = FrameStore::new();
        store.capture_with(|f| f.pc = 0x4000_1000).unwrap();
        store.freeze();
        assert_eq!(store.capture_with(|f| f.pc = 0), Err(FaultError::FrameFrozen));
        assert_eq!(store.lifecycle(), FrameLifecycle::Frozen);
        assert_eq!(store.with(|f| f.pc), Some(0x4000_1000));
    }

    #[test]
    fn freezing_an_empty_store_exposes_no_frame() {
        let store = FrameStore::new();
        store.freeze();
        assert_eq!(store.lifecycle(), FrameLifecycle::Frozen);
        assert_eq!(store.snapshot(), None);
    }
}
