// nt_faultdump/src/fault/ds/mod.rs

//! # Fault Data Structures Module
//!
//! Plain data shared by the fault subsystem: cause codes, the exception frame
//! and its save-area source, the handler signature and the error type. None of
//! it allocates.

pub mod types;
pub mod frame;
pub mod error;
pub mod handler;

pub use self::types::{CauseName, ExceptionCause, FrameHint, FATAL_CAUSES};

pub use self::frame::{
    ARegister, ExceptionFrame, ExtraRegisters, FrameLifecycle, HardwareSaveArea,
    AREG_COUNT, FRAME_WORDS, SAVED_WORDS,
};

pub use self::error::FaultError;

pub use self::handler::FaultHandler;
