// nt_faultdump/src/platform/esp8266.rs

//! ESP8266 (NONOS SDK) backend.
//!
//! Everything here is a thin wrapper over symbols the SDK, the ROM or the
//! board's trap-entry assembly provide at link time:
//!
//! - `_xtos_set_exception_handler`: HAL exception table, per-cause slots.
//! - `ets_wdt_disable` / `ets_wdt_enable`: ROM watchdog control.
//! - `ets_putc`: ROM UART0 output, usable with interrupts off.
//! - `nt_save_extra_sfrs`: assembly helper that stores LITBASE, SR176,
//!   SR208, EXCCAUSE and EXCVADDR before any Rust code can clobber them.

use crate::config::TargetConfig;
use crate::console::SerialPort;
use crate::fault::{
    CpuControl, ExceptionCause, ExtraRegisters, FaultHandler, FaultSystem, TrapInstaller, Watchdog,
};
use crate::platform::RegionMemory;
use core::ffi::{c_char, c_int};

extern "C" {
    fn _xtos_set_exception_handler(cause: c_int, handler: FaultHandler);
    fn ets_wdt_disable();
    fn ets_wdt_enable();
    fn ets_putc(c: c_char);
    fn nt_save_extra_sfrs(out: *mut ExtraRegisters);
}

pub struct XtosExceptionTable;

impl TrapInstaller for XtosExceptionTable {
    fn register(&self, cause: ExceptionCause, handler: FaultHandler) {
        unsafe { _xtos_set_exception_handler(cause.code() as c_int, handler) };
    }
}

pub struct RomWatchdog;

impl Watchdog for RomWatchdog {
    fn disable(&self) {
        unsafe { ets_wdt_disable() };
    }

    fn enable(&self) {
        unsafe { ets_wdt_enable() };
    }
}

pub struct Lx106;

impl CpuControl for Lx106 {
    fn save_extra_registers(&self) -> ExtraRegisters {
        let mut extra = ExtraRegisters::default();
        unsafe { nt_save_extra_sfrs(&mut extra) };
        extra
    }

    fn halt(&self) -> ! {
        crate::fault::halt_forever()
    }
}

pub struct RomUart;

impl SerialPort for RomUart {
    fn write_str(&self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                unsafe { ets_putc(b'\r' as c_char) };
            }
            unsafe { ets_putc(byte as c_char) };
        }
    }
}

static EXCEPTION_TABLE: XtosExceptionTable = XtosExceptionTable;
static WATCHDOG: RomWatchdog = RomWatchdog;
static CPU: Lx106 = Lx106;
static UART: RomUart = RomUart;
static DRAM: RegionMemory = RegionMemory::new(TargetConfig::ESP8266.ram);

/// ROM UART0, for [`console::set_port`](crate::console::set_port).
pub fn console() -> &'static dyn SerialPort {
    &UART
}

/// The reference board's fault system, ready for [`init_with`](crate::init_with).
///
/// Reports always go to the ROM UART, whatever the console port is.
pub fn fault_system() -> FaultSystem<'static> {
    FaultSystem::new(&EXCEPTION_TABLE, &WATCHDOG, &CPU, &DRAM, &UART, TargetConfig::ESP8266)
}
