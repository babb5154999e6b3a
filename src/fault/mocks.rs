// nt_faultdump/src/fault/mocks.rs

//! Mock platform services for host tests.
//!
//! [`MockBoard`] stands in for the whole board: exception table, watchdog,
//! CPU and serial port. Its `halt` unwinds with a [`Halted`] payload so a test
//! can catch the end of a fatal trap with `std::panic::catch_unwind`.

#![cfg(test)]

use crate::console::SerialPort;
use crate::fault::ds::{ExceptionCause, ExtraRegisters, FaultHandler, HardwareSaveArea};
use crate::fault::infrastructure::di::container::FaultSystem;
use crate::fault::infrastructure::di::traits::{CpuControl, MemoryProbe, TrapInstaller, Watchdog};
use core::sync::atomic::{AtomicUsize, Ordering};
use spin::Mutex;
use std::collections::BTreeMap;
use std::string::String;
use std::vec::Vec;

/// Panic payload used by [`MockBoard::halt`].
#[derive(Debug)]
pub struct Halted;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    ExtraSaved,
    /// `output_len` is how many bytes had been printed at that point.
    WatchdogDisabled { output_len: usize },
    WatchdogEnabled { output_len: usize },
    Halted,
}

pub struct MockBoard {
    bindings: Mutex<BTreeMap<u32, FaultHandler>>,
    register_calls: AtomicUsize,
    events: Mutex<Vec<BoardEvent>>,
    output: Mutex<String>,
    extra: ExtraRegisters,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::with_extra(ExtraRegisters::default())
    }

    pub fn with_extra(extra: ExtraRegisters) -> Self {
        Self {
            bindings: Mutex::new(BTreeMap::new()),
            register_calls: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
            output: Mutex::new(String::new()),
            extra,
        }
    }

    /// Cause code to handler address.
    pub fn bindings(&self) -> BTreeMap<u32, usize> {
        self.bindings.lock().iter().map(|(cause, handler)| (*cause, *handler as usize)).collect()
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    /// Plays the trap-entry role: calls whatever is bound to `cause`.
    /// Returns `false` if nothing is bound.
    ///
    /// # Safety
    /// `save_area` must be valid for the bound handler.
    pub unsafe fn inject(&self, cause: u32, save_area: *mut HardwareSaveArea) -> bool {
        let handler = self.bindings.lock().get(&cause).copied();
        match handler {
            Some(handler) => {
                unsafe { handler(save_area) };
                true
            }
            None => false,
        }
    }

    pub fn events(&self) -> Vec<BoardEvent> {
        self.events.lock().clone()
    }

    pub fn output(&self) -> String {
        self.output.lock().clone()
    }

    fn record(&self, event: BoardEvent) {
        self.events.lock().push(event);
    }

    fn output_len(&self) -> usize {
        self.output.lock().len()
    }
}

impl TrapInstaller for MockBoard {
    fn register(&self, cause: ExceptionCause, handler: FaultHandler) {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.bindings.lock().insert(cause.code(), handler);
    }
}

impl Watchdog for MockBoard {
    fn disable(&self) {
        let output_len = self.output_len();
        self.record(BoardEvent::WatchdogDisabled { output_len });
    }

    fn enable(&self) {
        let output_len = self.output_len();
        self.record(BoardEvent::WatchdogEnabled { output_len });
    }
}

impl CpuControl for MockBoard {
    fn save_extra_registers(&self) -> ExtraRegisters {
        self.record(BoardEvent::ExtraSaved);
        self.extra
    }

    fn halt(&self) -> ! {
        self.record(BoardEvent::Halted);
        std::panic::panic_any(Halted)
    }
}

impl SerialPort for MockBoard {
    fn write_str(&self, s: &str) {
        self.output.lock().push_str(s);
    }
}

/// Word-addressed memory starting at `base`; reads are recorded in order.
pub struct WordMemory {
    base: u32,
    words: Vec<u32>,
    reads: Mutex<Vec<u32>>,
}

impl WordMemory {
    pub fn new(base: u32, words: &[u32]) -> Self {
        Self {
            base,
            words: words.to_vec(),
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn reads(&self) -> Vec<u32> {
        self.reads.lock().clone()
    }
}

impl MemoryProbe for WordMemory {
    fn read_word(&self, addr: u32) -> Option<u32> {
        if addr < self.base || (addr - self.base) % 4 != 0 {
            return None;
        }
        let value = self.words.get(((addr - self.base) / 4) as usize).copied()?;
        self.reads.lock().push(addr);
        Some(value)
    }
}

/// Memory whose every read raises a second fatal trap on the armed system,
/// as a bad stack pointer would on hardware.
pub struct TrappingMemory {
    system: AtomicUsize,
    nested: HardwareSaveArea,
    traps: AtomicUsize,
}

impl TrappingMemory {
    /// `nested` is the save area the second trap hands over.
    pub fn new(nested: HardwareSaveArea) -> Self {
        Self {
            system: AtomicUsize::new(0),
            nested,
            traps: AtomicUsize::new(0),
        }
    }

    /// `system` must outlive every read.
    pub fn arm(&self, system: &FaultSystem<'_>) {
        self.system.store(system as *const FaultSystem<'_> as usize, Ordering::SeqCst);
    }

    pub fn traps(&self) -> usize {
        self.traps.load(Ordering::SeqCst)
    }
}

impl MemoryProbe for TrappingMemory {
    fn read_word(&self, _addr: u32) -> Option<u32> {
        let system = self.system.load(Ordering::SeqCst) as *const FaultSystem<'static>;
        // Safety: `arm` requires the system to outlive the reads.
        if let Some(system) = unsafe { system.as_ref() } {
            self.traps.fetch_add(1, Ordering::SeqCst);
            unsafe { system.handle_fatal(&self.nested) }
        }
        None
    }
}
