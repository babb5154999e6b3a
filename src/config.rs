// nt_faultdump/src/config.rs

//! Per-target memory map and calibration constants.
//!
//! Nothing in here is probed at runtime: every value is fixed when the
//! firmware is built and handed to [`FaultSystem`](crate::FaultSystem) once.

/// A half-open `[start, end)` span of the 32-bit address space.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: u32,
    pub end: u32,
}

impl MemoryRegion {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub const fn contains(&self, addr: u32) -> bool {
        addr >= self.start && addr < self.end
    }

    /// Checks that all of `[addr, addr + len)` lies inside the region.
    pub const fn contains_span(&self, addr: u32, len: u32) -> bool {
        match addr.checked_add(len) {
            Some(last) => addr >= self.start && last <= self.end,
            None => false,
        }
    }
}

/// Build-time description of the target the fault handler runs on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    /// Shown in the install log line, so a board log tells which preset it picked.
    pub name: &'static str,
    /// Data RAM. Stack dump reads outside of it are refused.
    pub ram: MemoryRegion,
    /// Upper bound (exclusive) of the stack dump.
    pub stack_top: u32,
    /// Bytes added to the save-area address to recover the stack pointer.
    ///
    /// This is a calibration constant, not a property of the ISA. It has to be
    /// measured per SDK/toolchain by comparing against a debugger reading of
    /// `a1` at fault time. Zero means the reported `sp` is the save-area
    /// address itself.
    pub sp_offset: u32,
}

impl TargetConfig {
    /// ESP8266 (NONOS SDK): DRAM at 0x3FFE8000..0x40000000, the SDK keeps its
    /// last 0x50 bytes for the ROM.
    pub const ESP8266: TargetConfig = TargetConfig {
        name: "esp8266",
        ram: MemoryRegion::new(0x3FFE_8000, 0x4000_0000),
        stack_top: 0x3FFF_FFB0,
        sp_offset: 0,
    };

    pub const fn new(name: &'static str, ram: MemoryRegion, stack_top: u32, sp_offset: u32) -> Self {
        Self {
            name,
            ram,
            stack_top,
            sp_offset,
        }
    }

    /// The stack dump upper bound, clamped to the end of RAM.
    pub fn stack_end(&self) -> u32 {
        core::cmp::min(self.stack_top, self.ram.end)
    }

    /// Whether the recovered stack pointer is the raw save-area address
    /// rather than a calibrated fault-time `a1`.
    pub fn sp_is_save_area(&self) -> bool {
        self.sp_offset == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_bounds_are_half_open() {
        let ram = MemoryRegion::new(0x1000, 0x2000);
        assert!(ram.contains(0x1000));
        assert!(ram.contains(0x1FFF));
        assert!(!ram.contains(0x2000));
        assert!(!ram.contains(0x0FFF));
    }

    #[test]
    fn span_check_handles_tail_and_overflow() {
        let ram = MemoryRegion::new(0x1000, 0x2000);
        assert!(ram.contains_span(0x1FFC, 4));
        assert!(!ram.contains_span(0x1FFD, 4));
        assert!(!ram.contains_span(u32::MAX - 1, 4));
    }

    #[test]
    fn esp8266_stack_end_stays_inside_dram() {
        let cfg = TargetConfig::ESP8266;
        assert_eq!(cfg.stack_end(), 0x3FFF_FFB0);
        assert!(cfg.ram.contains(cfg.stack_end() - 4));
        assert!(cfg.sp_is_save_area());
    }

    #[test]
    fn stack_top_past_ram_is_clamped() {
        let cfg = TargetConfig::new("test", MemoryRegion::new(0x100, 0x200), 0x400, 0);
        assert_eq!(cfg.stack_end(), 0x200);
    }
}
