// nt_faultdump/src/fault/ds/types.rs

//! # Exception Cause Definitions
//!
//! Xtensa `EXCCAUSE` values and the subset this subsystem treats as fatal.

use core::fmt;

/// General exception causes, as written to `EXCCAUSE` by the hardware.
///
/// Reserved codes have no variant; [`ExceptionCause::from_code`] returns
/// `None` for them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ExceptionCause {
    /// Illegal instruction.
    Illegal = 0,
    /// `SYSCALL` instruction.
    Syscall = 1,
    /// Instruction fetch error.
    InstrError = 2,
    /// Load or store error.
    LoadStoreError = 3,
    /// Level-1 interrupt taken as an exception.
    Level1Interrupt = 4,
    /// `MOVSP` stack extension assist for alloca.
    Alloca = 5,
    /// Integer divide by zero.
    DivideByZero = 6,
    /// Use of a failed speculative access.
    Speculation = 7,
    /// Privileged instruction.
    Privileged = 8,
    /// Unaligned load or store.
    Unaligned = 9,
    /// PIF data error on instruction fetch.
    InstrDataError = 12,
    /// PIF data error on load or store.
    LoadStoreDataError = 13,
    /// PIF address error on instruction fetch.
    InstrAddrError = 14,
    /// PIF address error on load or store.
    LoadStoreAddrError = 15,
    ItlbMiss = 16,
    ItlbMultiHit = 17,
    /// Ring privilege violation on instruction fetch.
    InstrRing = 18,
    /// Cache attribute does not allow instruction fetch.
    InstrProhibited = 20,
    DtlbMiss = 24,
    DtlbMultiHit = 25,
    /// Ring privilege violation on load or store.
    LoadStoreRing = 26,
    /// Cache attribute does not allow load.
    LoadProhibited = 28,
    /// Cache attribute does not allow store.
    StoreProhibited = 29,
    Cp0Disabled = 32,
    Cp1Disabled = 33,
    Cp2Disabled = 34,
    Cp3Disabled = 35,
    Cp4Disabled = 36,
    Cp5Disabled = 37,
    Cp6Disabled = 38,
    Cp7Disabled = 39,
}

impl ExceptionCause {
    /// Decodes a raw `EXCCAUSE` value.
    pub fn from_code(code: u32) -> Option<Self> {
        use ExceptionCause::*;
        let cause = match code {
            0 => Illegal,
            1 => Syscall,
            2 => InstrError,
            3 => LoadStoreError,
            4 => Level1Interrupt,
            5 => Alloca,
            6 => DivideByZero,
            7 => Speculation,
            8 => Privileged,
            9 => Unaligned,
            12 => InstrDataError,
            13 => LoadStoreDataError,
            14 => InstrAddrError,
            15 => LoadStoreAddrError,
            16 => ItlbMiss,
            17 => ItlbMultiHit,
            18 => InstrRing,
            20 => InstrProhibited,
            24 => DtlbMiss,
            25 => DtlbMultiHit,
            26 => LoadStoreRing,
            28 => LoadProhibited,
            29 => StoreProhibited,
            32 => Cp0Disabled,
            33 => Cp1Disabled,
            34 => Cp2Disabled,
            35 => Cp3Disabled,
            36 => Cp4Disabled,
            37 => Cp5Disabled,
            38 => Cp6Disabled,
            39 => Cp7Disabled,
            _ => return None,
        };
        Some(cause)
    }

    /// The raw `EXCCAUSE` value.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Whether the fault handler is installed for this cause.
    pub fn is_fatal(self) -> bool {
        FATAL_CAUSES.contains(&self)
    }
}

/// Causes the fault handler is bound to, in installation order.
///
/// Window over/underflow, alloca and interrupts keep the platform's own
/// handlers; everything here means the running code cannot continue.
pub const FATAL_CAUSES: [ExceptionCause; 13] = [
    ExceptionCause::Illegal,
    ExceptionCause::Syscall,
    ExceptionCause::InstrError,
    ExceptionCause::LoadStoreError,
    ExceptionCause::DivideByZero,
    ExceptionCause::Unaligned,
    ExceptionCause::InstrDataError,
    ExceptionCause::LoadStoreDataError,
    ExceptionCause::InstrAddrError,
    ExceptionCause::LoadStoreAddrError,
    ExceptionCause::InstrProhibited,
    ExceptionCause::LoadProhibited,
    ExceptionCause::StoreProhibited,
];

/// Wrapper that prints a raw cause code with its name, if it has one.
#[derive(Copy, Clone)]
pub struct CauseName(pub u32);

impl fmt::Display for CauseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ExceptionCause::from_code(self.0) {
            Some(cause) => write!(f, "{:?}", cause),
            None => write!(f, "Unknown"),
        }
    }
}

/// Result of the stack-frame heuristic for one 16-byte stride.
///
/// Only a hint: ordinary data can look like a frame and real frames can be
/// missed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameHint {
    Likely,
    Unlikely,
}

impl FrameHint {
    /// Marker glyph printed at the end of the stride's line.
    pub fn marker(self) -> char {
        match self {
            FrameHint::Likely => '<',
            FrameHint::Unlikely => ' ',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_decoder() {
        for code in 0..64u32 {
            if let Some(cause) = ExceptionCause::from_code(code) {
                assert_eq!(cause.code(), code);
            }
        }
    }

    #[test]
    fn reserved_codes_do_not_decode() {
        for code in [10u32, 11, 19, 21, 22, 23, 27, 30, 31, 40, 255] {
            assert_eq!(ExceptionCause::from_code(code), None);
        }
    }

    #[test]
    fn fatal_set_has_thirteen_distinct_causes() {
        let mut codes: std::vec::Vec<u32> = FATAL_CAUSES.iter().map(|c| c.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes, [0, 1, 2, 3, 6, 9, 12, 13, 14, 15, 20, 28, 29]);
        assert!(ExceptionCause::DivideByZero.is_fatal());
        assert!(!ExceptionCause::Alloca.is_fatal());
    }

    #[test]
    fn cause_name_falls_back_to_unknown() {
        assert_eq!(std::format!("{}", CauseName(6)), "DivideByZero");
        assert_eq!(std::format!("{}", CauseName(11)), "Unknown");
    }
}
