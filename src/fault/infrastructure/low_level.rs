// nt_faultdump/src/fault/infrastructure/low_level.rs

//! # Low-Level Fault Entry
//!
//! The `extern "C"` function the platform's exception table points at, and
//! the last-resort halt used when no fault system is available.

use crate::fault::ds::HardwareSaveArea;

/// Target of every fatal-cause slot in the platform's exception table.
///
/// Hands the save area to the globally installed
/// [`FaultSystem`](super::di::container::FaultSystem). Never returns.
///
/// # Safety
///
/// Must only be called by the platform dispatcher, with `save_area` pointing
/// at the register block it saved for this trap.
#[no_mangle]
pub unsafe extern "C" fn fatal_exception_entry(save_area: *mut HardwareSaveArea) {
    // Safety: forwarded from the dispatcher.
    unsafe { crate::fault::infrastructure::di::dispatch_fault(save_area) }
}

/// Parks the core with nothing but the CPU itself.
pub fn halt_forever() -> ! {
    loop {
        wait_for_debugger();
    }
}

#[cfg(target_arch = "riscv32")]
#[inline]
fn wait_for_debugger() {
    // 等待中断，降低功耗
    unsafe { riscv::asm::wfi() };
}

#[cfg(not(target_arch = "riscv32"))]
#[inline]
fn wait_for_debugger() {
    core::hint::spin_loop();
}
