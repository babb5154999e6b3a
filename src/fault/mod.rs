// nt_faultdump/src/fault/mod.rs

//! # Fatal Exception Subsystem
//!
//! Captures the CPU state when the core traps into an unrecoverable
//! exception, prints it with a stack dump and halts. There is no way back
//! from a fatal trap; only a reset or an attached debugger ends the halt.

mod ds;
mod infrastructure;
mod api;
mod mocks;

// Publicly re-export the entire API module.
pub use self::api::*;

pub use self::ds::{
    ARegister, CauseName, ExceptionCause, FrameHint, FATAL_CAUSES,     // Causes and register indices
    ExceptionFrame, ExtraRegisters, HardwareSaveArea, FrameLifecycle,   // Frame structures
    AREG_COUNT, FRAME_WORDS, SAVED_WORDS,
    FaultError, FaultHandler,
};

pub use self::infrastructure::di::container::FaultSystem;
pub use self::infrastructure::di::traits::{CpuControl, MemoryProbe, SerialPort, TrapInstaller, Watchdog};
pub use self::infrastructure::frame_store::FrameStore;
pub use self::infrastructure::low_level::{fatal_exception_entry, halt_forever};
pub use self::infrastructure::{recovery, registry, reporter};

/// Installs a board-supplied fault system and binds it to every fatal cause.
///
/// Call once, as early as possible after reset. A second call is ignored and
/// returns [`FaultError::AlreadyInitialized`].
pub fn init_with(system: FaultSystem<'static>) -> Result<(), FaultError> {
    infrastructure::initialize_fault_system(system).map(|_| ())
}

/// Installs the fault handler for the ESP8266 reference platform.
#[cfg(feature = "esp8266")]
pub fn init() {
    if !crate::console::set_port(crate::platform::esp8266::console()) {
        crate::warn_print!("Console port already set, keeping it");
    }
    // The only failure is a repeated call, which already logs a warning.
    let _ = init_with(crate::platform::esp8266::fault_system());
}
