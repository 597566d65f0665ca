//! Flow control: branches, jumps, subroutine and exception returns, traps.

use super::reg_0007;
use crate::exceptions::Exception;
use crate::flags::{Status, V};
use crate::instruction::OpParams;
use crate::state::ProcessorState;

type Outcome = Result<(), Exception>;

fn condition(state: &ProcessorState<'_>) -> bool {
    Status::condition(state.regs.sr, ((state.opcode >> 8) & 0x0F) as u8)
}

/// Bcc and BRA. `first` is the target.
pub fn bcc(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    if condition(state) {
        state.regs.pc = params.first;
    }
    Ok(())
}

pub fn bsr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.push_long(state.regs.pc)?;
    state.regs.pc = params.first;
    Ok(())
}

/// DBcc: unless the condition holds, decrement Dn.W and branch while it
/// isn't -1.
pub fn dbcc(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    if condition(state) {
        return Ok(());
    }
    let n = reg_0007(state.opcode);
    let counter = (state.regs.d[n] as u16).wrapping_sub(1);
    state.regs.d[n] = (state.regs.d[n] & 0xFFFF_0000) | u32::from(counter);
    if counter != 0xFFFF {
        state.regs.pc = params.first;
    }
    Ok(())
}

pub fn scc(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = if condition(state) { 0xFF } else { 0 };
    Ok(())
}

pub fn jmp(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.pc = params.first;
    Ok(())
}

pub fn jsr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.push_long(state.regs.pc)?;
    state.regs.pc = params.first;
    Ok(())
}

pub fn rts(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    state.regs.pc = state.pop_long()?;
    Ok(())
}

pub fn rtr(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    let ccr = state.pop_word()?;
    state.regs.pc = state.pop_long()?;
    state.set_ccr(ccr);
    Ok(())
}

/// RTD #d: return and release `d` bytes of arguments.
pub fn rtd(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.pc = state.pop_long()?;
    let sp = state.regs.active_sp().wrapping_add(params.first);
    state.regs.set_active_sp(sp);
    Ok(())
}

pub fn rte(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    state.return_from_exception()
}

pub fn trap(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    Err(Exception::Trap(params.first as u8))
}

pub fn trapv(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    if state.regs.sr & V != 0 {
        return Err(Exception::TrapV);
    }
    Ok(())
}

pub fn trapcc(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    if condition(state) {
        return Err(Exception::TrapV);
    }
    Ok(())
}

/// ILLEGAL, and BKPT (no breakpoint acknowledge cycle here).
pub fn illegal(_state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    Err(Exception::IllegalInstruction)
}
