// nt_faultdump/src/fault/infrastructure/registry.rs

//! # Fatal Cause Registry
//!
//! Binds one handler to every cause in [`FATAL_CAUSES`]. Works before any
//! scheduler or heap exists.

use crate::fault::ds::{FaultHandler, FATAL_CAUSES};
use crate::fault::infrastructure::di::traits::TrapInstaller;

/// Registers `handler` for every fatal cause and returns how many causes were
/// bound.
///
/// Calling this again rebinds the same causes to the same handler, so the
/// resulting exception table does not change.
pub fn install(installer: &dyn TrapInstaller, handler: FaultHandler) -> usize {
    for cause in FATAL_CAUSES {
        installer.register(cause, handler);
    }
    FATAL_CAUSES.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::ds::{ExceptionCause, HardwareSaveArea};
    use crate::fault::mocks::MockBoard;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static HITS: [AtomicUsize; 40] = [const { AtomicUsize::new(0) }; 40];

    unsafe extern "C" fn counting_handler(save_area: *mut HardwareSaveArea) {
        let cause = unsafe { (*save_area).a[0] } as usize;
        HITS[cause].fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "C" fn other_handler(_: *mut HardwareSaveArea) {}

    #[test]
    fn every_fatal_cause_gets_the_same_handler() {
        let board = MockBoard::new();
        assert_eq!(install(&board, counting_handler), 13);

        let bindings = board.bindings();
        assert_eq!(bindings.len(), 13);
        for cause in FATAL_CAUSES {
            assert_eq!(bindings.get(&cause.code()), Some(&(counting_handler as usize)));
        }
        assert!(!bindings.contains_key(&ExceptionCause::Alloca.code()));
    }

    #[test]
    fn injected_faults_run_the_handler_once_each() {
        let board = MockBoard::new();
        install(&board, counting_handler);

        for cause in FATAL_CAUSES {
            let mut area = HardwareSaveArea { pc: 0, ps: 0, sar: 0, vpri: 0, a0: 0, a: [0; 14] };
            area.a[0] = cause.code();
            assert!(unsafe { board.inject(cause.code(), &mut area) });
        }
        for cause in FATAL_CAUSES {
            assert_eq!(HITS[cause.code() as usize].load(Ordering::SeqCst), 1, "{:?}", cause);
        }
        let mut area = HardwareSaveArea { pc: 0, ps: 0, sar: 0, vpri: 0, a0: 0, a: [0; 14] };
        assert!(!unsafe { board.inject(ExceptionCause::Alloca.code(), &mut area) });
    }

    #[test]
    fn installing_twice_leaves_the_same_table() {
        let board = MockBoard::new();
        install(&board, other_handler);
        let first = board.bindings();
        install(&board, other_handler);
        assert_eq!(board.bindings(), first);
        assert_eq!(board.register_calls(), 26);
    }
}
