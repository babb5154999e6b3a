// nt_faultdump/src/fault/ds/handler.rs

//! # Fault Handler Signature

use super::frame::HardwareSaveArea;

/// What the platform's trap installation facility calls on a fatal trap.
///
/// The pointer refers to the dispatcher's save area for the duration of the
/// call. Handlers bound through this crate never return, but the C-side
/// table stores a plain `void (*)(frame *)`, so the type does too.
pub type FaultHandler = unsafe extern "C" fn(save_area: *mut HardwareSaveArea);
