// nt_faultdump/src/fault/infrastructure/reporter.rs

//! # Diagnostic Reporter
//!
//! Renders an [`ExceptionFrame`] and a raw stack dump as text. Output goes
//! straight to the sink with no buffering, so a partial report still shows
//! everything up to the point where the sink or the memory gave out.
//!
//! ```text
//! Fatal exception 6 (DivideByZero)
//! pc=0x40001000 sp=0x3ffffd40 excvaddr=0x00000000 (sp is save area address)
//! ps=0x00000030 sar=0x00000000 vpri=0x00000000
//! r00: 0x40100abc=1074793148 r01: 0x3ffffd40=1073741120 r02: ...
//! ...
//!
//! Stack dump:
//! 3ffffd40:  00000001 00000002 3ffffd50 00000004 <
//! ```

use crate::config::TargetConfig;
use crate::fault::ds::{ARegister, CauseName, ExceptionFrame, ExtraRegisters, FrameHint};
use crate::fault::infrastructure::di::traits::MemoryProbe;
use core::fmt::{self, Write};

/// Bytes covered by one stack dump line.
pub const STACK_STRIDE: u32 = 16;

/// Writes the full report: cause, special registers, address registers and
/// the stack dump from the recovered `sp` up to the configured stack top.
pub fn report(
    out: &mut dyn Write,
    frame: &ExceptionFrame,
    config: &TargetConfig,
    memory: &dyn MemoryProbe,
) -> fmt::Result {
    print_reason(out, frame, config)?;
    print_registers(out, frame)?;

    let start = frame.a1;
    if start % 4 != 0 || !config.ram.contains(start) {
        writeln!(
            out,
            "\nStack dump skipped: sp=0x{:08x} is outside RAM 0x{:08x}..0x{:08x}\n",
            start, config.ram.start, config.ram.end
        )?;
        return Ok(());
    }
    print_stack(out, memory, start, config.stack_end())
}

/// Cause line, then program counter, stack pointer, fault address, then
/// the status words.
///
/// On an uncalibrated target the `sp` shown is the save-area address, and the
/// line says so.
pub fn print_reason(out: &mut dyn Write, frame: &ExceptionFrame, config: &TargetConfig) -> fmt::Result {
    writeln!(out, "Fatal exception {} ({})", frame.reason, CauseName(frame.reason))?;
    write!(
        out,
        "pc=0x{:08x} sp=0x{:08x} excvaddr=0x{:08x}",
        frame.pc, frame.a1, frame.excvaddr
    )?;
    if config.sp_is_save_area() {
        write!(out, " (sp is save area address)")?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "ps=0x{:08x} sar=0x{:08x} vpri=0x{:08x}",
        frame.ps, frame.sar, frame.vpri
    )
}

/// Cause and fault address alone, for when no save area was handed over.
pub fn print_cause(out: &mut dyn Write, extra: &ExtraRegisters) -> fmt::Result {
    writeln!(
        out,
        "Fatal exception {} ({}) excvaddr=0x{:08x}",
        extra.reason,
        CauseName(extra.reason),
        extra.excvaddr
    )
}

/// `a0`..`a15`, each as hex and as signed decimal, three to a line.
pub fn print_registers(out: &mut dyn Write, frame: &ExceptionFrame) -> fmt::Result {
    for reg in ARegister::all() {
        let value = frame.areg(reg);
        write!(out, "r{:02}: 0x{:08x}={:>10} ", reg.index(), value, value as i32)?;
        if reg.index() % 3 == 2 {
            writeln!(out)?;
        }
    }
    writeln!(out)
}

/// Dumps `[start, end)` in 16-byte strides.
///
/// Every word goes through `memory`, so refusing an address there is how a
/// target keeps the walk off unmapped space. The first refused stride ends
/// the dump.
pub fn print_stack(out: &mut dyn Write, memory: &dyn MemoryProbe, start: u32, end: u32) -> fmt::Result {
    writeln!(out, "\nStack dump:")?;
    let mut pos = start;
    while pos < end {
        match read_stride(memory, pos) {
            Some(words) => {
                writeln!(
                    out,
                    "{:08x}:  {:08x} {:08x} {:08x} {:08x} {}",
                    pos,
                    words[0],
                    words[1],
                    words[2],
                    words[3],
                    classify(pos, &words).marker()
                )?;
            }
            None => {
                writeln!(out, "{:08x}:  <unreadable>", pos)?;
                break;
            }
        }
        pos = match pos.checked_add(STACK_STRIDE) {
            Some(next) => next,
            None => break,
        };
    }
    writeln!(out)
}

/// Reads the four words of the stride at `base`.
pub fn read_stride(memory: &dyn MemoryProbe, base: u32) -> Option<[u32; 4]> {
    let mut words = [0u32; 4];
    for (i, word) in words.iter_mut().enumerate() {
        let addr = base.checked_add(i as u32 * 4)?;
        *word = memory.read_word(addr)?;
    }
    Some(words)
}

/// Guesses whether the stride at `base` starts a stack frame.
///
/// Frames built by the windowed ABI tend to hold a pointer to the next frame
/// in their third word, which lands exactly one stride higher.
pub fn classify(base: u32, words: &[u32; 4]) -> FrameHint {
    if Some(words[2]) == base.checked_add(STACK_STRIDE) {
        FrameHint::Likely
    } else {
        FrameHint::Unlikely
    }
}
