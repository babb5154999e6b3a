// nt_faultdump/src/fault/infrastructure/di/mod.rs

//! # Dependency Injection System - Global Access and Initialization
//!
//! Holds the one process-wide [`FaultSystem`] that the `extern "C"` fault
//! entry reaches, and the functions to install and query it.

pub mod container;
pub mod traits;

use self::container::FaultSystem;
use crate::fault::ds::{FaultError, HardwareSaveArea};
use crate::fault::infrastructure::low_level;
use crate::{error_print, info_print, warn_print};
use spin::Once;

/// The global `FaultSystem` instance. Written once at startup, read from
/// trap context afterwards.
static GLOBAL_FAULT_SYSTEM: Once<FaultSystem<'static>> = Once::new();

/// Stores `system` as the global fault system and binds the fault entry to
/// every fatal cause.
///
/// Needs no heap and no scheduler, so it can run first thing after reset.
/// A second call leaves the first system in place and returns
/// [`FaultError::AlreadyInitialized`].
pub fn initialize_fault_system(system: FaultSystem<'static>) -> Result<&'static FaultSystem<'static>, FaultError> {
    let mut fresh = false;
    let installed = GLOBAL_FAULT_SYSTEM.call_once(|| {
        fresh = true;
        system
    });
    if !fresh {
        warn_print!("Fault handler already installed, ignoring second init");
        return Err(FaultError::AlreadyInitialized);
    }

    let causes = installed.install(low_level::fatal_exception_entry);
    info_print!(
        "Fatal exception handler installed for {} causes ({})",
        causes,
        installed.config().name
    );
    Ok(installed)
}

/// Returns the global fault system, if one has been installed.
pub fn fault_system() -> Option<&'static FaultSystem<'static>> {
    GLOBAL_FAULT_SYSTEM.get()
}

/// Checks if the fault system has been initialized.
pub fn is_initialized() -> bool {
    GLOBAL_FAULT_SYSTEM.is_completed()
}

/// Called by `low_level::fatal_exception_entry`.
///
/// # Safety
/// `save_area` comes straight from the platform dispatcher.
pub(super) unsafe fn dispatch_fault(save_area: *mut HardwareSaveArea) -> ! {
    match GLOBAL_FAULT_SYSTEM.get() {
        // Safety: forwarded from the dispatcher.
        Some(system) => unsafe { system.handle_fatal(save_area) },
        None => {
            error_print!("Fatal exception before fault handler init");
            low_level::halt_forever()
        }
    }
}
