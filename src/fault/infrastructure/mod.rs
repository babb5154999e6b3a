// nt_faultdump/src/fault/infrastructure/mod.rs

//! # Fault Infrastructure Module
//!
//! The working parts of the fault subsystem: the DI container and its
//! global, the fatal-cause registry, stack pointer recovery, the reporter
//! and the `extern "C"` entry point.

// The Dependency Injection (DI) framework.
pub mod di;

pub mod frame_store;
pub mod low_level;
pub mod recovery;
pub mod registry;
pub mod reporter;

pub use di::initialize_fault_system;
