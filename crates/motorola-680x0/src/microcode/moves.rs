//! Data movement: MOVE family, MOVEM, MOVEP and status-register moves.

use super::{reg_0007, reg_0e00};
use crate::alu::{Size, sign_extend};
use crate::exceptions::Exception;
use crate::flags::CCR_MASK;
use crate::instruction::OpParams;
use crate::model::CpuModel;
use crate::state::ProcessorState;

type Outcome = Result<(), Exception>;

/// MOVE, MOVEA, MOVEQ, LEA: the result is the source.
pub fn move_(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = params.first;
    Ok(())
}

pub fn pea(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.push_long(params.first)
}

pub fn move_to_ccr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.set_ccr(params.first as u16);
    Ok(())
}

pub fn move_to_sr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.set_sr(params.first as u16);
    Ok(())
}

pub fn move_from_sr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = u32::from(state.regs.sr);
    Ok(())
}

pub fn move_from_ccr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = u32::from(state.regs.sr & CCR_MASK);
    Ok(())
}

/// MOVEM registers to memory. `first` is the register mask, `second` the
/// base address.
///
/// For -(An) the mask is reversed (bit 0 is A7) and registers are stored
/// downwards. The 68000 and 68010 store the initial value of An when it is
/// in the list; the 68020 and later store the final value.
pub fn movem_to_memory(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let mask = params.first as u16;
    let size = params.size;
    let step = size.bytes();
    let opcode = state.opcode;
    let predecrement = opcode & 0x38 == 0x20;

    if !predecrement {
        let mut addr = params.second;
        for index in 0..16 {
            if mask & (1 << index) != 0 {
                let value = state.regs.general(index);
                state.write_data(addr, size, value)?;
                addr = addr.wrapping_add(step);
            }
        }
        return Ok(());
    }

    let an = reg_0007(opcode);
    let initial = params.second;
    let final_addr = initial.wrapping_sub(step * u32::from(mask.count_ones()));
    let mut addr = initial;
    for bit in 0..16 {
        if mask & (1 << bit) != 0 {
            let index = 15 - bit;
            addr = addr.wrapping_sub(step);
            let value = if index == 8 + an && state.model >= CpuModel::M68020 {
                final_addr
            } else {
                state.regs.general(index)
            };
            state.write_data(addr, size, value)?;
        }
    }
    state.regs.set_a(an, addr);
    Ok(())
}

/// MOVEM memory to registers. Words are sign-extended into the whole
/// register. For (An)+ the final address is written back to An.
pub fn movem_to_registers(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let mask = params.first as u16;
    let size = params.size;
    let mut addr = params.second;
    // (d16,PC) and (d8,PC,Xn) sources live in program space.
    let fc = if matches!(state.opcode & 0x3F, 0x3A | 0x3B) {
        state.program_space()
    } else {
        state.data_space()
    };
    for index in 0..16 {
        if mask & (1 << index) != 0 {
            let value = sign_extend(state.read(addr, size, fc)?, size);
            state.regs.set_general(index, value);
            addr = addr.wrapping_add(size.bytes());
        }
    }
    if state.opcode & 0x38 == 0x18 {
        state.regs.set_a(reg_0007(state.opcode), addr);
    }
    Ok(())
}

/// MOVEP: transfer a word or long between Dn and alternate bytes of
/// memory. `first` is the address.
pub fn movep(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let opcode = state.opcode;
    let n = reg_0e00(opcode);
    let bytes: u32 = if opcode & 0x0040 != 0 { 4 } else { 2 };
    let addr = params.first;

    if opcode & 0x0080 != 0 {
        let value = state.regs.d[n];
        for i in 0..bytes {
            let shift = 8 * (bytes - 1 - i);
            state.write_data(addr.wrapping_add(2 * i), Size::Byte, value >> shift)?;
        }
    } else {
        let mut value = 0u32;
        for i in 0..bytes {
            value = (value << 8) | state.read_data(addr.wrapping_add(2 * i), Size::Byte)?;
        }
        state.regs.d[n] = if bytes == 4 {
            value
        } else {
            (state.regs.d[n] & 0xFFFF_0000) | value
        };
    }
    Ok(())
}
