//! Logical operations, status-register immediates and single-bit tests.
//!
//! AND, OR, EOR and NOT leave the CCR to the generic store.

use crate::exceptions::Exception;
use crate::flags::{CCR_MASK, Status, Z};
use crate::instruction::{OpParams, Target};
use crate::state::ProcessorState;

type Outcome = Result<(), Exception>;

pub fn and(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = params.first & params.second;
    Ok(())
}

pub fn or(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = params.first | params.second;
    Ok(())
}

pub fn eor(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = params.first ^ params.second;
    Ok(())
}

pub fn not(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = !params.second;
    Ok(())
}

pub fn and_to_ccr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.sr &= (params.first as u16) | !CCR_MASK;
    Ok(())
}

pub fn or_to_ccr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.sr |= (params.first as u16) & CCR_MASK;
    Ok(())
}

pub fn eor_to_ccr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.sr ^= (params.first as u16) & CCR_MASK;
    Ok(())
}

pub fn and_to_sr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.set_sr(state.regs.sr & params.first as u16);
    Ok(())
}

pub fn or_to_sr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.set_sr(state.regs.sr | params.first as u16);
    Ok(())
}

pub fn eor_to_sr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.set_sr(state.regs.sr ^ params.first as u16);
    Ok(())
}

/// Bit number modulo the operand width: 32 for Dn, 8 for memory.
fn bit_mask(params: &OpParams) -> u32 {
    let width = if matches!(params.target, Target::Data(_)) {
        32
    } else {
        8
    };
    1 << (params.first % width)
}

fn test_bit(state: &mut ProcessorState<'_>, value: u32, mask: u32) {
    state.regs.sr = Status::set_if(state.regs.sr, Z, value & mask == 0);
}

/// BTST. The operand is a source, so the width comes from the mode field.
pub fn btst(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let width = if state.opcode & 0x38 == 0 { 32 } else { 8 };
    let mask = 1 << (params.first % width);
    test_bit(state, params.second, mask);
    Ok(())
}

pub fn bchg(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let mask = bit_mask(params);
    test_bit(state, params.second, mask);
    params.result = params.second ^ mask;
    Ok(())
}

pub fn bclr(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let mask = bit_mask(params);
    test_bit(state, params.second, mask);
    params.result = params.second & !mask;
    Ok(())
}

pub fn bset(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let mask = bit_mask(params);
    test_bit(state, params.second, mask);
    params.result = params.second | mask;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alu::Size;
    use crate::flags::{C, N, S, X};
    use crate::memory::FlatMemory;
    use crate::model::CpuModel;

    #[test]
    fn andi_to_ccr_leaves_system_byte() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.regs.sr = S | X | N | C;
        let mut params = OpParams::new(Size::Byte);
        params.first = u32::from(X);
        and_to_ccr(&mut state, &mut params).unwrap();
        assert_eq!(state.regs.sr, S | X);
    }

    #[test]
    fn bit_number_wraps_by_operand_width() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        let mut params = OpParams::new(Size::Long);
        params.target = Target::Data(0);
        params.first = 33;
        params.second = 0;
        bset(&mut state, &mut params).unwrap();
        assert_eq!(params.result, 2);
        assert_ne!(state.regs.sr & Z, 0);

        let mut params = OpParams::new(Size::Byte);
        params.target = Target::Memory;
        params.first = 9;
        params.second = 0xFF;
        bclr(&mut state, &mut params).unwrap();
        assert_eq!(params.result, 0xFD);
        assert_eq!(state.regs.sr & Z, 0);
    }
}
