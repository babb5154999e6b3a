// nt_faultdump/src/fault/infrastructure/recovery.rs

//! # Stack Pointer Recovery
//!
//! The HAL dispatcher reuses `a1` to reach the handler, so the saved value of
//! the stack pointer is gone by the time we run. The dispatcher always builds
//! its save area at a fixed distance from the faulting stack, which makes the
//! save-area address itself the best available anchor.
//!
//! The distance is per SDK and toolchain. It lives in
//! [`TargetConfig::sp_offset`](crate::TargetConfig::sp_offset) and must be
//! measured on real hardware; with an offset of zero the reported `sp` is the
//! save-area address, which still lies on the faulting stack and is what the
//! stack dump starts from.

use crate::config::TargetConfig;
use crate::fault::ds::HardwareSaveArea;

// Frames and the stack dump carry addresses as 32-bit words.
#[cfg(all(target_os = "none", not(target_pointer_width = "32")))]
compile_error!("bare-metal targets must have 32-bit pointers");

/// Recovers the fault-time stack pointer from the save-area address.
///
/// Addresses are 32-bit on every bare-metal target this builds for. Only
/// hosted test builds are wider, and there the low 32 bits are kept.
pub fn recover_stack_pointer(save_area: *const HardwareSaveArea, config: &TargetConfig) -> u32 {
    (save_area as usize as u32).wrapping_add(config.sp_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryRegion;

    fn config_with_offset(sp_offset: u32) -> TargetConfig {
        TargetConfig::new("test", MemoryRegion::new(0, u32::MAX), u32::MAX, sp_offset)
    }

    #[test]
    fn uncalibrated_target_reports_save_area_address() {
        let area = HardwareSaveArea { pc: 0, ps: 0, sar: 0, vpri: 0, a0: 0, a: [0; 14] };
        let ptr = &area as *const HardwareSaveArea;
        assert_eq!(recover_stack_pointer(ptr, &TargetConfig::ESP8266), ptr as usize as u32);
    }

    #[test]
    fn calibration_offset_is_added_to_the_anchor() {
        let ptr = 0x3FFF_FD40usize as *const HardwareSaveArea;
        assert_eq!(recover_stack_pointer(ptr, &config_with_offset(0x100)), 0x3FFF_FE40);
        assert_eq!(recover_stack_pointer(ptr, &config_with_offset(0)), 0x3FFF_FD40);
    }

    #[test]
    fn offset_wraps_instead_of_overflowing() {
        let ptr = 0xFFFF_FFF0usize as *const HardwareSaveArea;
        assert_eq!(recover_stack_pointer(ptr, &config_with_offset(0x20)), 0x10);
    }
}
