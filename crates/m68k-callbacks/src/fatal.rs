//! Terminal handlers for exceptions nobody else claimed.
//!
//! Each writes `v68k: exception: <message>` to stderr and raises the host
//! signal that best matches the fault. If the signal is caught and returns,
//! the emulator is told not to resume.

use std::io::Write;

use motorola_680x0::ProcessorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Ill,
    Fpe,
    Trap,
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn raise(signal: Signal) {
    let signal = match signal {
        Signal::Ill => libc::SIGILL,
        Signal::Fpe => libc::SIGFPE,
        Signal::Trap => libc::SIGTRAP,
    };
    // SAFETY: raise(3) takes a plain signal number and touches no memory
    // of ours.
    unsafe {
        libc::raise(signal);
    }
}

#[cfg(not(unix))]
fn raise(_signal: Signal) {
    std::process::abort();
}

fn terminate(message: &str, signal: Signal) -> Option<u16> {
    let mut stderr = std::io::stderr().lock();
    // Nothing useful to do if stderr is gone; the signal still goes out.
    let _ = writeln!(stderr, "v68k: exception: {message}");
    let _ = stderr.flush();
    drop(stderr);
    raise(signal);
    None
}

pub(crate) fn illegal_instruction(_state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate("Illegal Instruction", Signal::Ill)
}

pub(crate) fn division_by_zero(_state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate("Division By Zero", Signal::Fpe)
}

pub(crate) fn chk_range(_state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate("CHK range exceeded", Signal::Fpe)
}

pub(crate) fn trapv_overflow(_state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate("TRAPV on overflow", Signal::Fpe)
}

pub(crate) fn privilege_violation(_state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate("Privilege Violation", Signal::Ill)
}

pub(crate) fn trace_exception(_state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate("Trace Exception", Signal::Trap)
}

pub(crate) fn line_a_emulator(_state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate("Line A Emulator", Signal::Ill)
}

pub(crate) fn line_f_emulator(_state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate("Line F Emulator", Signal::Ill)
}

/// Text for an A-line trap with no host implementation; D1 holds the trap
/// word.
fn unimplemented_trap_message(trap: u32) -> String {
    format!("Unimplemented Mac trap: A{:03X}", trap & 0x0FFF)
}

pub(crate) fn unimplemented_trap(state: &mut ProcessorState<'_>) -> Option<u16> {
    terminate(&unimplemented_trap_message(state.regs.d[1]), Signal::Ill)
}
