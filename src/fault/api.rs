// nt_faultdump/src/fault/api.rs

//! # Public API for the Fault Subsystem
//!
//! Read-side queries on the global fault system. Normal code never sees a
//! captured frame (the core halts first), so these are mostly for
//! post-mortem tooling and self tests.

use crate::fault::ds::{ARegister, ExceptionFrame, FaultError, FrameLifecycle};
use crate::fault::infrastructure::di;

/// Returns `true` once [`init_with`](super::init_with) has run.
pub fn is_initialized() -> bool {
    di::is_initialized()
}

/// Where the global frame is in its lifecycle.
pub fn frame_lifecycle() -> Result<FrameLifecycle, FaultError> {
    let system = di::fault_system().ok_or(FaultError::NotInitialized)?;
    Ok(system.frame().lifecycle())
}

/// Copy of the captured exception frame.
pub fn saved_frame() -> Result<ExceptionFrame, FaultError> {
    let system = di::fault_system().ok_or(FaultError::NotInitialized)?;
    system.frame().snapshot().ok_or(FaultError::FrameUnavailable)
}

/// Value of address register `a{index}` in the captured frame.
///
/// `index` 1 is the recovered stack pointer, never the raw saved value.
pub fn register_value(index: usize) -> Result<u32, FaultError> {
    let reg = ARegister::new(index)?;
    let system = di::fault_system().ok_or(FaultError::NotInitialized)?;
    system
        .frame()
        .with(|frame| frame.areg(reg))
        .ok_or(FaultError::FrameUnavailable)
}
