// nt_faultdump/src/lib.rs

//! Fatal exception capture and reporting for single-core microcontrollers.
//!
//! When the CPU traps into an unrecoverable exception the registered handler
//! snapshots the register state, silences the watchdog, prints a register and
//! stack dump over the serial console and parks the core for a debugger.

#![cfg_attr(not(test), no_std)]

// 声明模块
pub mod config;
pub mod console;
pub mod fault;
pub mod platform;
pub mod selftest;

pub use config::{MemoryRegion, TargetConfig};
pub use fault::{init_with, ExceptionCause, ExceptionFrame, FaultError, FaultSystem};

#[cfg(feature = "esp8266")]
pub use fault::init;
