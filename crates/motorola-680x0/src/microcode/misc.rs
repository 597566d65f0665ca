//! System control and stack-frame instructions.

use tracing::info;

use super::reg_0007;
use crate::alu::{Size, sign_extend};
use crate::exceptions::Exception;
use crate::instruction::OpParams;
use crate::memory::FunctionCode;
use crate::state::{Condition, ProcessorState};

type Outcome = Result<(), Exception>;

pub fn nop(_state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    Ok(())
}

/// RESET asserts the external reset line; there are no devices to reset.
pub fn reset(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    info!(pc = state.instruction_pc, "RESET instruction");
    Ok(())
}

pub fn stop(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.set_sr(params.first as u16);
    state.condition = Condition::Stopped;
    info!(sr = state.regs.sr, "stopped");
    Ok(())
}

/// LINK An,#d. `first` is the displacement. LINK A7 saves the already
/// decremented stack pointer.
pub fn link(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let n = reg_0007(state.opcode);
    let sp = state.regs.active_sp().wrapping_sub(4);
    let saved = if n == 7 { sp } else { state.regs.a(n) };
    state.write_data(sp, Size::Long, saved)?;
    state.regs.set_active_sp(sp);
    state.regs.set_a(n, sp);
    state.regs.set_active_sp(sp.wrapping_add(params.first));
    Ok(())
}

pub fn unlk(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    let n = reg_0007(state.opcode);
    let frame = state.regs.a(n);
    let saved = state.read_data(frame, Size::Long)?;
    state.regs.set_active_sp(frame.wrapping_add(4));
    state.regs.set_a(n, saved);
    Ok(())
}

/// MOVE An,USP (bit 3 clear) and MOVE USP,An.
pub fn move_usp(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    let n = reg_0007(state.opcode);
    if state.opcode & 0x0008 == 0 {
        state.regs.usp = state.regs.a(n);
    } else {
        let usp = state.regs.usp;
        state.regs.set_a(n, usp);
    }
    Ok(())
}

fn control_register(state: &ProcessorState<'_>, code: u16) -> Option<u32> {
    let regs = &state.regs;
    let caps = state.model.capabilities();
    match code {
        0x000 => Some(u32::from(regs.sfc)),
        0x001 => Some(u32::from(regs.dfc)),
        0x800 => Some(regs.usp),
        0x801 => Some(regs.vbr),
        0x002 if caps.cacr => Some(regs.cacr),
        0x802 if caps.cacr => Some(regs.caar),
        0x803 if caps.cacr => Some(regs.msp),
        0x804 if caps.cacr => Some(regs.ssp),
        _ => None,
    }
}

fn set_control_register(state: &mut ProcessorState<'_>, code: u16, value: u32) -> Option<()> {
    let caps = state.model.capabilities();
    let regs = &mut state.regs;
    match code {
        0x000 => regs.sfc = (value & 7) as u8,
        0x001 => regs.dfc = (value & 7) as u8,
        0x800 => regs.usp = value,
        0x801 => regs.vbr = value,
        0x002 if caps.cacr => regs.cacr = value,
        0x802 if caps.cacr => regs.caar = value,
        0x803 if caps.cacr => regs.msp = value,
        0x804 if caps.cacr => regs.ssp = value,
        _ => return None,
    }
    Some(())
}

/// MOVEC. Bit 0 of the opcode selects general register to control
/// register; `first` is the extension word.
pub fn movec(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let general = (params.first >> 12) as usize;
    let code = (params.first & 0x0FFF) as u16;
    if state.opcode & 1 == 0 {
        let value = control_register(state, code).ok_or(Exception::IllegalInstruction)?;
        state.regs.set_general(general, value);
    } else {
        let value = state.regs.general(general);
        set_control_register(state, code, value).ok_or(Exception::IllegalInstruction)?;
    }
    Ok(())
}

/// MOVES: move between a register and the address space selected by SFC
/// (read) or DFC (write). `first` is the extension word; the effective
/// address is the target.
pub fn moves(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let ext = params.first;
    let general = (ext >> 12) as usize;
    let size = params.size;
    let addr = params.address;

    if ext & 0x0800 != 0 {
        let fc = FunctionCode::from_bits(state.regs.dfc).ok_or(Exception::BusError)?;
        let value = state.regs.general(general);
        state.write(addr, size, value, fc)
    } else {
        let fc = FunctionCode::from_bits(state.regs.sfc).ok_or(Exception::BusError)?;
        let value = state.read(addr, size, fc)?;
        if general >= 8 {
            state.regs.set_a(general & 7, sign_extend(value, size));
        } else {
            super::arith::set_data(state, general, value, size);
        }
        Ok(())
    }
}
