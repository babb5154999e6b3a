// nt_faultdump/src/platform/mod.rs

//! Board backends for the fault subsystem's platform traits.

#[cfg(feature = "esp8266")]
pub mod esp8266;

#[cfg(target_arch = "riscv32")]
pub mod sbi;

use crate::config::MemoryRegion;
use crate::fault::MemoryProbe;

/// Reads physical memory directly, but only aligned words inside `region`.
///
/// This is what keeps the stack dump from wandering into unmapped space when
/// the recovered stack pointer or the configured stack top is wrong.
pub struct RegionMemory {
    region: MemoryRegion,
}

impl RegionMemory {
    pub const fn new(region: MemoryRegion) -> Self {
        Self { region }
    }

    pub fn region(&self) -> MemoryRegion {
        self.region
    }

    /// Whether `read_word(addr)` would touch memory.
    pub fn permits(&self, addr: u32) -> bool {
        addr % 4 == 0 && self.region.contains_span(addr, 4)
    }
}

impl MemoryProbe for RegionMemory {
    fn read_word(&self, addr: u32) -> Option<u32> {
        if !self.permits(addr) {
            return None;
        }
        // Safety: aligned and inside the region the board declared readable.
        Some(unsafe { core::ptr::read_volatile(addr as usize as *const u32) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_misaligned_and_out_of_region_reads() {
        let memory = RegionMemory::new(MemoryRegion::new(0x3FFE_8000, 0x4000_0000));
        assert_eq!(memory.read_word(0x3FFE_8002), None);
        assert_eq!(memory.read_word(0x3FFE_7FFC), None);
        assert_eq!(memory.read_word(0x4000_0000), None);
        assert_eq!(memory.read_word(0x3FFF_FFFE), None);
    }

    #[test]
    fn permits_last_full_word() {
        let memory = RegionMemory::new(MemoryRegion::new(0x3FFE_8000, 0x4000_0000));
        assert!(memory.permits(0x3FFF_FFFC));
        assert!(memory.permits(0x3FFE_8000));
        assert!(!memory.permits(0x3FFF_FFFD));
    }

    #[test]
    fn riscv_backend_is_limited_to_rv32() {
        let manifest = include_str!("../../Cargo.toml");
        assert!(manifest.contains("[target.'cfg(target_arch = \"riscv32\")'.dependencies]"));
        assert!(!manifest.contains("riscv64"));
    }
}
