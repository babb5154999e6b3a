// nt_faultdump/src/fault/infrastructure/di/container.rs

//! # Fault System Dependency Injection Container
//!
//! Defines `FaultSystem`, which holds the platform services, the target
//! configuration and the exception frame, and runs the fatal-trap sequence.

use super::traits::{CpuControl, MemoryProbe, SerialPort, TrapInstaller, Watchdog};
use crate::config::TargetConfig;
use crate::console::PortWriter;
use crate::fault::ds::{ExtraRegisters, FaultError, FaultHandler, HardwareSaveArea};
use crate::fault::infrastructure::frame_store::FrameStore;
use crate::fault::infrastructure::{recovery, registry, reporter};
use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};

pub struct FaultSystem<'a> {
    installer: &'a dyn TrapInstaller,
    watchdog: &'a dyn Watchdog,
    cpu: &'a dyn CpuControl,
    memory: &'a dyn MemoryProbe,
    serial: &'a dyn SerialPort,
    config: TargetConfig,
    frame: FrameStore,
    /// Set once a fatal trap starts reporting; a trap seen while it is set
    /// came from the report itself.
    reporting: AtomicBool,
}

impl<'a> FaultSystem<'a> {
    /// Creates a new `FaultSystem` by injecting its dependencies.
    pub fn new(
        installer: &'a dyn TrapInstaller,
        watchdog: &'a dyn Watchdog,
        cpu: &'a dyn CpuControl,
        memory: &'a dyn MemoryProbe,
        serial: &'a dyn SerialPort,
        config: TargetConfig,
    ) -> Self {
        Self {
            installer,
            watchdog,
            cpu,
            memory,
            serial,
            config,
            frame: FrameStore::new(),
            reporting: AtomicBool::new(false),
        }
    }

    /// Binds `handler` to every fatal cause. See [`registry::install`].
    pub fn install(&self, handler: FaultHandler) -> usize {
        registry::install(self.installer, handler)
    }

    /// Fills the exception frame from a trap.
    ///
    /// Order is fixed: live special registers first, then the save-area
    /// prefix, then the recovered stack pointer.
    ///
    /// # Safety
    /// `save_area` must be null or point to a readable [`HardwareSaveArea`].
    pub unsafe fn capture(&self, save_area: *const HardwareSaveArea) -> Result<(), FaultError> {
        let extra = self.cpu.save_extra_registers();
        // Safety: guaranteed by the caller.
        unsafe { self.store(&extra, save_area) }
    }

    /// # Safety
    /// Same contract as [`capture`](Self::capture).
    unsafe fn store(&self, extra: &ExtraRegisters, save_area: *const HardwareSaveArea) -> Result<(), FaultError> {
        // Safety: guaranteed by the caller.
        let area = unsafe { save_area.as_ref() }.ok_or(FaultError::FrameUnavailable)?;
        self.frame.capture_with(|frame| {
            frame.store_extra(extra);
            frame.copy_saved(area);
            frame.a1 = recovery::recover_stack_pointer(save_area, &self.config);
        })
    }

    /// The fatal-trap sequence: capture, silence the watchdog, report, halt.
    ///
    /// # Safety
    /// Same contract as [`capture`](Self::capture). Must only be reached from
    /// trap entry (or a test standing in for it).
    pub unsafe fn handle_fatal(&self, save_area: *const HardwareSaveArea) -> ! {
        let mut out = PortWriter::new(self.serial);

        if self.reporting.swap(true, Ordering::SeqCst) {
            // Faulted while printing, most likely in the stack walk. Keep the
            // original frame.
            let _ = writeln!(out, "\nNested fatal exception during report, halting.");
            self.frame.freeze();
            self.cpu.halt();
        }

        let extra = self.cpu.save_extra_registers();
        // Safety: forwarded from the caller.
        let captured = unsafe { self.store(&extra, save_area) };

        self.watchdog.disable();
        let _ = writeln!(out, "\nFatal exception, register state follows.");
        match captured {
            Ok(()) => {
                let _ = self
                    .frame
                    .with(|frame| reporter::report(&mut out, frame, &self.config, self.memory));
            }
            Err(err) => {
                let _ = writeln!(out, "No register dump: {}", err);
                let _ = reporter::print_cause(&mut out, &extra);
            }
        }
        self.watchdog.enable();

        self.frame.freeze();
        self.cpu.halt()
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Provides read access to the exception frame.
    pub fn frame(&self) -> &FrameStore {
        &self.frame
    }

    pub fn is_reporting(&self) -> bool {
        self.reporting.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryRegion;
    use crate::fault::ds::{ExceptionFrame, ExtraRegisters, FrameLifecycle, SAVED_WORDS};
    use crate::fault::mocks::{BoardEvent, Halted, MockBoard, TrappingMemory, WordMemory};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn sentinel_area() -> HardwareSaveArea {
        let mut area = HardwareSaveArea { pc: 0xA000_0000, ps: 0xA000_0001, sar: 0xA000_0002, vpri: 0xA000_0003, a0: 0xA000_0004, a: [0; 14] };
        for (i, slot) in area.a.iter_mut().enumerate() {
            *slot = 0xA000_0005 + i as u32;
        }
        area
    }

    fn open_config() -> TargetConfig {
        TargetConfig::new("test", MemoryRegion::new(0, 0xFFFF_FFF0), 0xFFFF_FFF0, 0)
    }

    fn run_to_halt(system: &FaultSystem<'_>, save_area: *const HardwareSaveArea) {
        let result = catch_unwind(AssertUnwindSafe(|| unsafe { system.handle_fatal(save_area) }));
        let payload = result.expect_err("handler returned");
        assert!(payload.downcast_ref::<Halted>().is_some());
    }

    #[test]
    fn capture_copies_nineteen_words_and_recovers_sp() {
        let extra = ExtraRegisters { litbase: 0xB1, sr176: 0xB2, sr208: 0xB3, reason: 9, excvaddr: 0xB5 };
        let board = MockBoard::with_extra(extra);
        let memory = WordMemory::new(0, &[]);
        let system = FaultSystem::new(&board, &board, &board, &memory, &board, open_config());

        let area = sentinel_area();
        let ptr = &area as *const HardwareSaveArea;
        unsafe { system.capture(ptr) }.unwrap();

        let frame: ExceptionFrame = system.frame().snapshot().unwrap();
        let words = frame.to_words();
        for (i, word) in words[..SAVED_WORDS].iter().enumerate() {
            assert_eq!(*word, 0xA000_0000 + i as u32, "word {}", i);
        }
        assert_eq!(&words[SAVED_WORDS..], &[0xB1, 0xB2, 0xB3, ptr as usize as u32, 9, 0xB5]);
        assert_eq!(board.events(), [BoardEvent::ExtraSaved]);
    }

    #[test]
    fn divide_by_zero_trap_end_to_end() {
        let extra = ExtraRegisters { reason: 6, excvaddr: 0, ..ExtraRegisters::default() };
        let board = MockBoard::with_extra(extra);
        let mut area = HardwareSaveArea { pc: 0x4000_1000, ps: 0x30, sar: 0, vpri: 0, a0: 0x4010_0000, a: [0; 14] };
        let ptr = &mut area as *mut HardwareSaveArea;
        let sp = ptr as usize as u32;
        let memory = WordMemory::new(sp, &[0, 0, sp + 16, 0, 1, 2, 3, 4]);
        let config = TargetConfig::new("test", MemoryRegion::new(sp, sp + 32), sp + 32, 0);
        let system = FaultSystem::new(&board, &board, &board, &memory, &board, config);

        let entry = crate::fault::infrastructure::low_level::fatal_exception_entry;
        system.install(entry);
        assert_eq!(board.bindings().get(&6), Some(&(entry as usize)));
        run_to_halt(&system, ptr);

        let out = board.output();
        assert!(out.contains("Fatal exception 6 (DivideByZero)"));
        assert!(out.contains("pc=0x40001000"));
        assert!(out.contains(&std::format!("sp=0x{:08x}", sp)));
        assert!(out.contains(" <\n"));
        assert_eq!(board.bindings().len(), 13);

        let events = board.events();
        assert_eq!(events.first(), Some(&BoardEvent::ExtraSaved));
        assert_eq!(events[1], BoardEvent::WatchdogDisabled { output_len: 0 });
        assert_eq!(events[2], BoardEvent::WatchdogEnabled { output_len: out.len() });
        assert_eq!(events[3], BoardEvent::Halted);
        assert_eq!(system.frame().lifecycle(), FrameLifecycle::Frozen);
    }

    #[test]
    fn null_save_area_still_reports_and_halts() {
        let board = MockBoard::with_extra(ExtraRegisters { reason: 28, excvaddr: 0x10, ..ExtraRegisters::default() });
        let memory = WordMemory::new(0, &[]);
        let system = FaultSystem::new(&board, &board, &board, &memory, &board, open_config());

        run_to_halt(&system, core::ptr::null());

        let out = board.output();
        assert!(out.contains("No register dump: no exception frame has been captured\n"));
        assert!(out.contains("Fatal exception 28 (LoadProhibited) excvaddr=0x00000010\n"));
        assert_eq!(system.frame().lifecycle(), FrameLifecycle::Frozen);
        assert_eq!(system.frame().snapshot(), None);
    }

    #[test]
    fn trap_during_stack_walk_freezes_the_first_frame() {
        let board = MockBoard::with_extra(ExtraRegisters { reason: 28, ..ExtraRegisters::default() });
        let mut nested = sentinel_area();
        nested.pc = 0xDEAD_BEEF;
        let memory = TrappingMemory::new(nested);
        let config = TargetConfig::new("test", MemoryRegion::new(0, u32::MAX), u32::MAX, 0);
        let system = FaultSystem::new(&board, &board, &board, &memory, &board, config);
        memory.arm(&system);

        let first = sentinel_area();
        run_to_halt(&system, &first);

        assert_eq!(memory.traps(), 1);
        assert!(system.is_reporting());
        assert_eq!(system.frame().lifecycle(), FrameLifecycle::Frozen);
        let frame = system.frame().snapshot().unwrap();
        assert_eq!(frame.pc, first.pc);
        assert_eq!(frame.reason, 28);

        let out = board.output();
        assert!(out.contains("\nStack dump:\n"));
        assert!(out.ends_with("Nested fatal exception during report, halting.\n"));
        assert_eq!(
            board.events(),
            [BoardEvent::ExtraSaved, BoardEvent::WatchdogDisabled { output_len: 0 }, BoardEvent::Halted]
        );
    }
}
