// nt_faultdump/src/platform/sbi.rs

//! SBI console backend for RISC-V boards.
//!
//! The legacy console call goes straight to firmware, so it still works from
//! a trap handler with interrupts off.

use crate::console::SerialPort;
use sbi_rt::legacy;

/// 默认控制台后端
pub static SBI_CONSOLE: SbiConsole = SbiConsole;

pub struct SbiConsole;

impl SerialPort for SbiConsole {
    fn write_str(&self, s: &str) {
        for byte in s.bytes() {
            legacy::console_putchar(byte as usize);
        }
    }
}
