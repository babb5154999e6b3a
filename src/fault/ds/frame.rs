// nt_faultdump/src/fault/ds/frame.rs

//! # Exception Frame Structures
//!
//! The register block the trap-entry code hands over, and the frame the
//! fault handler builds from it.

use super::error::FaultError;
use super::types::ExceptionCause;
use core::mem::{offset_of, size_of};

/// Number of words in the hardware save area.
pub const SAVED_WORDS: usize = 19;

/// Number of words in a complete [`ExceptionFrame`].
pub const FRAME_WORDS: usize = 25;

/// Number of address registers reachable through [`ExceptionFrame::areg`].
pub const AREG_COUNT: usize = 16;

/// # Hardware Save Area
///
/// Layout written by the platform's exception dispatcher before it calls a
/// registered handler. The order is fixed by the HAL and must not change.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareSaveArea {
    pub pc: u32,
    pub ps: u32,
    pub sar: u32,
    pub vpri: u32,
    pub a0: u32,
    /// `a2`..`a15`.
    pub a: [u32; 14],
}

/// Special registers the dispatcher does not save, read by the trap-entry
/// assembly before anything can clobber them.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtraRegisters {
    pub litbase: u32,
    pub sr176: u32,
    pub sr208: u32,
    /// `EXCCAUSE`.
    pub reason: u32,
    /// `EXCVADDR`.
    pub excvaddr: u32,
}

/// # Exception Frame
///
/// CPU state at the moment of a fatal trap. The first [`SAVED_WORDS`] words
/// mirror [`HardwareSaveArea`] exactly; the rest is filled in separately.
///
/// `a1` is never copied from the save area: the dispatcher uses it to reach
/// the handler, so it only becomes valid after register recovery.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionFrame {
    pub pc: u32,
    pub ps: u32,
    pub sar: u32,
    pub vpri: u32,
    pub a0: u32,
    /// `a2`..`a15`.
    pub a: [u32; 14],
    pub litbase: u32,
    pub sr176: u32,
    pub sr208: u32,
    /// Recovered stack pointer.
    pub a1: u32,
    /// Raw `EXCCAUSE`.
    pub reason: u32,
    /// Faulting virtual address.
    pub excvaddr: u32,
}

const _: () = assert!(size_of::<HardwareSaveArea>() == SAVED_WORDS * 4);
const _: () = assert!(size_of::<ExceptionFrame>() == FRAME_WORDS * 4);
const _: () = assert!(offset_of!(ExceptionFrame, a) == offset_of!(HardwareSaveArea, a));
const _: () = assert!(offset_of!(ExceptionFrame, litbase) == SAVED_WORDS * 4);

impl ExceptionFrame {
    /// Creates a zeroed frame.
    pub const fn new() -> Self {
        Self {
            pc: 0,
            ps: 0,
            sar: 0,
            vpri: 0,
            a0: 0,
            a: [0; 14],
            litbase: 0,
            sr176: 0,
            sr208: 0,
            a1: 0,
            reason: 0,
            excvaddr: 0,
        }
    }

    /// Stores the registers the dispatcher leaves out.
    pub fn store_extra(&mut self, extra: &ExtraRegisters) {
        self.litbase = extra.litbase;
        self.sr176 = extra.sr176;
        self.sr208 = extra.sr208;
        self.reason = extra.reason;
        self.excvaddr = extra.excvaddr;
    }

    /// Copies the hardware-saved prefix. Leaves every later field alone.
    pub fn copy_saved(&mut self, area: &HardwareSaveArea) {
        self.pc = area.pc;
        self.ps = area.ps;
        self.sar = area.sar;
        self.vpri = area.vpri;
        self.a0 = area.a0;
        self.a = area.a;
    }

    /// The hardware-saved prefix as it was copied in.
    pub fn saved_prefix(&self) -> HardwareSaveArea {
        HardwareSaveArea {
            pc: self.pc,
            ps: self.ps,
            sar: self.sar,
            vpri: self.vpri,
            a0: self.a0,
            a: self.a,
        }
    }

    /// All fields in memory order.
    pub fn to_words(&self) -> [u32; FRAME_WORDS] {
        let mut words = [0u32; FRAME_WORDS];
        words[0] = self.pc;
        words[1] = self.ps;
        words[2] = self.sar;
        words[3] = self.vpri;
        words[4] = self.a0;
        words[5..SAVED_WORDS].copy_from_slice(&self.a);
        words[19] = self.litbase;
        words[20] = self.sr176;
        words[21] = self.sr208;
        words[22] = self.a1;
        words[23] = self.reason;
        words[24] = self.excvaddr;
        words
    }

    /// Value of address register `reg`.
    pub fn areg(&self, reg: ARegister) -> u32 {
        match reg.index() {
            0 => self.a0,
            1 => self.a1,
            n => self.a[n - 2],
        }
    }

    pub fn cause(&self) -> Option<ExceptionCause> {
        ExceptionCause::from_code(self.reason)
    }
}

impl Default for ExceptionFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// An address register index known to be in `0..AREG_COUNT`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ARegister(u8);

impl ARegister {
    pub const A0: ARegister = ARegister(0);
    /// Stack pointer.
    pub const A1: ARegister = ARegister(1);

    pub fn new(index: usize) -> Result<Self, FaultError> {
        if index < AREG_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(FaultError::RegisterOutOfRange(index))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Every valid register, `a0` first.
    pub fn all() -> impl Iterator<Item = ARegister> {
        (0..AREG_COUNT as u8).map(ARegister)
    }
}

impl TryFrom<usize> for ARegister {
    type Error = FaultError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

/// Where the process-wide frame is in its one-way lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameLifecycle {
    /// No fatal trap has happened since boot.
    Uninitialized,
    /// A trap wrote the frame; a later trap may still overwrite it.
    Captured,
    /// The handler has halted. The frame never changes again.
    Frozen,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> ExceptionFrame {
        let mut frame = ExceptionFrame::new();
        frame.a0 = 0xA0;
        frame.a1 = 0x3FFF_FF00;
        for (i, slot) in frame.a.iter_mut().enumerate() {
            *slot = 0x100 + i as u32;
        }
        frame
    }

    #[test]
    fn areg_maps_link_stack_and_general_registers() {
        let frame = sample_frame();
        assert_eq!(frame.areg(ARegister::A0), 0xA0);
        assert_eq!(frame.areg(ARegister::A1), 0x3FFF_FF00);
        assert_eq!(frame.areg(ARegister::new(2).unwrap()), 0x100);
        assert_eq!(frame.areg(ARegister::new(15).unwrap()), 0x10D);
    }

    #[test]
    fn areg_index_past_a15_is_rejected() {
        assert_eq!(ARegister::new(16), Err(FaultError::RegisterOutOfRange(16)));
        assert!(ARegister::try_from(usize::MAX).is_err());
        assert_eq!(ARegister::all().count(), AREG_COUNT);
    }

    #[test]
    fn copy_saved_keeps_extra_registers_and_sp() {
        let mut frame = ExceptionFrame::new();
        frame.store_extra(&ExtraRegisters {
            litbase: 1,
            sr176: 2,
            sr208: 3,
            reason: 6,
            excvaddr: 0xDEAD,
        });
        frame.a1 = 0x1234;
        let area = HardwareSaveArea { pc: 0x4000_1000, ps: 0x30, sar: 7, vpri: 0, a0: 9, a: [5; 14] };
        frame.copy_saved(&area);

        assert_eq!(frame.saved_prefix(), area);
        assert_eq!((frame.litbase, frame.sr176, frame.sr208), (1, 2, 3));
        assert_eq!(frame.a1, 0x1234);
        assert_eq!(frame.cause(), Some(ExceptionCause::DivideByZero));
    }

    #[test]
    fn word_view_follows_memory_layout() {
        let frame = sample_frame();
        let words = frame.to_words();
        assert_eq!(words[4], 0xA0);
        assert_eq!(words[5], 0x100);
        assert_eq!(words[18], 0x10D);
        assert_eq!(words[22], 0x3FFF_FF00);
    }
}
