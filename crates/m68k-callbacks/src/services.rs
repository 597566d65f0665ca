//! Memory Manager and Gestalt services, plus the trivial calls.

use motorola_680x0::{Access, FunctionCode, ProcessorState, RTS};
use tracing::{debug, error};

/// Low-memory global holding the last Memory Manager error.
pub const MEM_ERR: u32 = 0x0220;
pub const MEM_FULL_ERR: i16 = -108;
pub const PARAM_ERR: i32 = -50;
pub const GESTALT_UNDEF_SELECTOR_ERR: i32 = -5551;

/// Gestalt selector answered with 0 to identify this emulator.
pub const GESTALT_V68K: u32 = u32::from_be_bytes(*b"v68k");
/// Gestalt selector for the processor type.
pub const GESTALT_PROC: u32 = u32::from_be_bytes(*b"proc");

/// Call 0. Reaching it means emulated code jumped somewhere it never
/// should have.
pub(crate) fn unimplemented(state: &mut ProcessorState<'_>) -> Option<u16> {
    error!(pc = state.regs.pc, "unimplemented host call");
    std::process::abort()
}

pub(crate) fn no_op(_state: &mut ProcessorState<'_>) -> Option<u16> {
    Some(RTS)
}

/// NewPtr: D0 size in, A0 address out. On failure A0 is 0 and MemErr
/// holds memFullErr.
pub(crate) fn new_ptr(state: &mut ProcessorState<'_>) -> Option<u16> {
    let size = state.regs.d[0];
    let addr = state
        .mem
        .allocator()
        .and_then(|heap| heap.allocate(size))
        .unwrap_or(0);
    state.regs.a[0] = addr;
    if addr == 0 {
        debug!(size, "NewPtr failed");
        if state
            .mem
            .put_word(MEM_ERR, MEM_FULL_ERR as u16, FunctionCode::SupervisorData)
            .is_none()
        {
            debug!(addr = MEM_ERR, "MemErr global is not mapped");
        }
    }
    Some(RTS)
}

/// DisposePtr: A0 address in.
pub(crate) fn dispose_ptr(state: &mut ProcessorState<'_>) -> Option<u16> {
    let addr = state.regs.a[0];
    let freed = state
        .mem
        .allocator()
        .is_some_and(|heap| heap.deallocate(addr));
    if !freed {
        debug!(addr, "DisposePtr of unknown block");
    }
    Some(RTS)
}

fn copy(state: &mut ProcessorState<'_>, src: u32, dst: u32, len: u32) -> Option<()> {
    let bytes = state
        .mem
        .translate(src, len, FunctionCode::UserData, Access::Read)?
        .to_vec();
    state
        .mem
        .translate(dst, len, FunctionCode::UserData, Access::Write)?
        .copy_from_slice(&bytes);
    state
        .mem
        .translate(dst, len, FunctionCode::UserData, Access::Update)?;
    Some(())
}

/// BlockMove: A0 source, A1 destination, D0 count. Overlapping ranges
/// behave like memmove. D0 is 0, or paramErr if either range is not
/// accessible user data.
pub(crate) fn block_move(state: &mut ProcessorState<'_>) -> Option<u16> {
    let src = state.regs.a[0];
    let dst = state.regs.a[1];
    let len = state.regs.d[0];
    let result = match copy(state, src, dst, len) {
        Some(()) => 0,
        None => {
            debug!(src, dst, len, "BlockMove rejected");
            PARAM_ERR
        }
    };
    state.regs.d[0] = result as u32;
    Some(RTS)
}

/// Gestalt: D0 selector in; D0 result code and A0 response out.
pub(crate) fn gestalt(state: &mut ProcessorState<'_>) -> Option<u16> {
    let (result, value) = match state.regs.d[0] {
        GESTALT_V68K => (0, 0),
        GESTALT_PROC => (0, state.model.gestalt_processor_type()),
        _ => (GESTALT_UNDEF_SELECTOR_ERR, 0),
    };
    state.regs.d[0] = result as u32;
    state.regs.a[0] = value;
    Some(RTS)
}
