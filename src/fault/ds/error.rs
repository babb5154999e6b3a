// nt_faultdump/src/fault/ds/error.rs

//! # Fault Subsystem Errors
//!
//! The fatal exception itself is never an error value: it is reported and the
//! core halts. These variants only describe misuse of the subsystem's API.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultError {
    /// Register index outside `0..16`.
    RegisterOutOfRange(usize),
    /// No frame has been captured yet, or the save area pointer was null.
    FrameUnavailable,
    /// The handler has already halted on a previous fault.
    FrameFrozen,
    AlreadyInitialized,
    NotInitialized,
}

impl fmt::Display for FaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegisterOutOfRange(index) => write!(f, "register a{} does not exist (valid: a0..a15)", index),
            Self::FrameUnavailable => write!(f, "no exception frame has been captured"),
            Self::FrameFrozen => write!(f, "exception frame is frozen after halt"),
            Self::AlreadyInitialized => write!(f, "fault subsystem already initialized"),
            Self::NotInitialized => write!(f, "fault subsystem has not been initialized"),
        }
    }
}
