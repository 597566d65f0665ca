//! Shared operand load and result store.
//!
//! `store` owns the default condition-code policy: N and Z from the
//! sign-extended result, V and C cleared, X untouched. Address-register
//! destinations never touch the CCR, and microcode that computes its own
//! flags opts out with [`InstructionFlags::AND_SETS_CCR`].

use crate::alu::{merge, sign_extend};
use crate::exceptions::Exception;
use crate::flags::Status;
use crate::instruction::{InstructionFlags, OpParams, Target};
use crate::state::ProcessorState;

/// Load the destination operand into `params.second`.
pub fn load(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Result<(), Exception> {
    params.second = match params.target {
        Target::Data(n) => sign_extend(state.regs.d[n as usize], params.size),
        Target::Address(n) => state.regs.a(n as usize),
        Target::Memory => sign_extend(state.read_data(params.address, params.size)?, params.size),
        Target::None => params.second,
    };
    Ok(())
}

/// Write `params.result` to the target and update the CCR.
pub fn store(
    state: &mut ProcessorState<'_>,
    params: &OpParams,
    flags: InstructionFlags,
) -> Result<(), Exception> {
    if !flags.contains(InstructionFlags::STORES_DATA) {
        return Ok(());
    }

    let data = params.result;

    if let Target::Address(n) = params.target {
        state.regs.set_a(n as usize, data);
        return Ok(());
    }

    if !flags.contains(InstructionFlags::AND_SETS_CCR) {
        state.regs.sr = Status::logical(state.regs.sr, data, params.size);
    }

    match params.target {
        Target::Data(n) => {
            let reg = &mut state.regs.d[n as usize];
            *reg = merge(*reg, data, params.size);
            Ok(())
        }
        Target::Memory => state.write_data(params.address, params.size, data),
        Target::Address(_) | Target::None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alu::Size;
    use crate::flags::{C, N, V, X, Z};
    use crate::memory::FlatMemory;
    use crate::model::CpuModel;

    fn stores() -> InstructionFlags {
        InstructionFlags::STORES_DATA
    }

    #[test]
    fn byte_store_merges_into_data_register() {
        let mut mem = FlatMemory::new(0x100, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.regs.d[2] = 0x1234_5678;
        state.regs.sr = X | V | C;
        let mut params = OpParams::new(Size::Byte);
        params.target = Target::Data(2);
        params.result = 0xFFFF_FF80;
        store(&mut state, &params, stores()).unwrap();
        assert_eq!(state.regs.d[2], 0x1234_5680);
        assert_eq!(state.regs.sr & 0x1F, X | N);
    }

    #[test]
    fn address_register_store_keeps_flags() {
        let mut mem = FlatMemory::new(0x100, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.regs.sr = 0x2700 | Z | C;
        let mut params = OpParams::new(Size::Word);
        params.target = Target::Address(3);
        params.result = 0xFFFF_8000;
        store(&mut state, &params, stores()).unwrap();
        assert_eq!(state.regs.a(3), 0xFFFF_8000);
        assert_eq!(state.regs.sr, 0x2700 | Z | C);
    }

    #[test]
    fn load_sign_extends_memory() {
        let mut mem = FlatMemory::new(0x100, 0);
        mem.load(0x20, &[0xFF, 0xFE]);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        let mut params = OpParams::new(Size::Word);
        params.target = Target::Memory;
        params.address = 0x20;
        load(&mut state, &mut params).unwrap();
        assert_eq!(params.second, 0xFFFF_FFFE);
    }

    #[test]
    fn without_stores_data_nothing_changes() {
        let mut mem = FlatMemory::new(0x100, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.regs.sr = 0x2700 | V;
        let mut params = OpParams::new(Size::Long);
        params.target = Target::Data(0);
        params.result = 7;
        store(&mut state, &params, InstructionFlags::NONE).unwrap();
        assert_eq!(state.regs.d[0], 0);
        assert_eq!(state.regs.sr, 0x2700 | V);
    }

    #[test]
    fn memory_store_writes_by_size() {
        let mut mem = FlatMemory::new(0x100, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        let mut params = OpParams::new(Size::Word);
        params.target = Target::Memory;
        params.address = 0x40;
        params.result = 0x0001_0000;
        store(&mut state, &params, stores()).unwrap();
        assert_ne!(state.regs.sr & Z, 0);
        drop(state);
        assert_eq!(mem.peek_long(0x40), 0);
    }
}
