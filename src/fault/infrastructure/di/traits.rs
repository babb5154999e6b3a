// nt_faultdump/src/fault/infrastructure/di/traits.rs

//! # Dependency Injection Traits
//!
//! The platform services the fault handler depends on. Each board supplies
//! one implementation per trait; tests supply mocks.
//!
//! Everything here is called from inside a fatal trap: implementations must
//! not allocate, must not take locks normal code might hold, and must not
//! depend on a scheduler.

use crate::fault::ds::{ExceptionCause, ExtraRegisters, FaultHandler};

pub use crate::console::SerialPort;

/// The platform's exception table.
pub trait TrapInstaller: Sync {
    /// Binds `handler` to `cause`, replacing whatever was bound before.
    fn register(&self, cause: ExceptionCause, handler: FaultHandler);
}

/// The hardware watchdog.
pub trait Watchdog: Sync {
    fn disable(&self);
    fn enable(&self);
}

/// Core-level operations that need the real CPU.
pub trait CpuControl: Sync {
    /// Returns the special registers the dispatcher did not save.
    ///
    /// Must be the first thing the handler does: the values are live CPU
    /// state and later code can change them.
    fn save_extra_registers(&self) -> ExtraRegisters;

    /// Parks the core forever. Only a reset or a debugger gets it out.
    fn halt(&self) -> !;
}

/// Word-granular read access for the stack dump.
pub trait MemoryProbe: Sync {
    /// Reads the 32-bit word at `addr`, or `None` if that address must not be
    /// dereferenced.
    fn read_word(&self, addr: u32) -> Option<u32>;
}
