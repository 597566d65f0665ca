use motorola_680x0::flags::{C, CCR_MASK, N, V, X, Z};
use motorola_680x0::instruction::{InstructionFlags, OpParams, Target};
use motorola_680x0::load_store::{load, store};
use motorola_680x0::{CpuModel, FlatMemory, ProcessorState, Size, merge, sign_extend};
use proptest::prelude::*;

fn sizes() -> impl Strategy<Value = Size> {
    prop_oneof![Just(Size::Byte), Just(Size::Word), Just(Size::Long)]
}

fn flag_sets() -> impl Strategy<Value = InstructionFlags> {
    (any::<bool>(), any::<bool>()).prop_map(|(loads, sets_ccr)| {
        let mut flags = InstructionFlags::STORES_DATA;
        if loads {
            flags = flags | InstructionFlags::LOADS_AND;
        }
        if sets_ccr {
            flags = flags | InstructionFlags::AND_SETS_CCR;
        }
        flags
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        rng_algorithm: proptest::test_runner::RngAlgorithm::ChaCha,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0x6800_0000),
        .. ProptestConfig::default()
    })]

    #[test]
    fn data_register_store_then_load_round_trips(
        size in sizes(),
        reg in 0u8..8,
        old in any::<u32>(),
        result in any::<u32>(),
        ccr in 0u16..0x20,
    ) {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.regs.d[usize::from(reg)] = old;
        state.regs.sr = 0x2700 | ccr;

        let mut params = OpParams::new(size);
        params.target = Target::Data(reg);
        params.result = result;
        store(&mut state, &params, InstructionFlags::STORES_DATA).unwrap();

        let stored = state.regs.d[usize::from(reg)];
        prop_assert_eq!(stored, merge(old, result, size));
        prop_assert_eq!(stored & !size.mask(), old & !size.mask());

        let value = sign_extend(result, size);
        let sr = state.regs.sr;
        prop_assert_eq!(sr & X, ccr & X);
        prop_assert_eq!(sr & (V | C), 0);
        prop_assert_eq!(sr & Z != 0, result & size.mask() == 0);
        prop_assert_eq!(sr & N != 0, value & 0x8000_0000 != 0);

        load(&mut state, &mut params).unwrap();
        prop_assert_eq!(params.second, value);
    }

    #[test]
    fn address_register_store_never_touches_ccr(
        size in sizes(),
        reg in 0u8..7,
        result in any::<u32>(),
        ccr in 0u16..0x20,
        flags in flag_sets(),
    ) {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.regs.sr = 0x2700 | ccr;

        let mut params = OpParams::new(size);
        params.target = Target::Address(reg);
        params.result = result;
        store(&mut state, &params, flags).unwrap();

        prop_assert_eq!(state.regs.a(usize::from(reg)), result);
        prop_assert_eq!(state.regs.sr & CCR_MASK, ccr);
    }

    #[test]
    fn microcode_flags_survive_the_store(
        size in sizes(),
        reg in 0u8..8,
        result in any::<u32>(),
        ccr in 0u16..0x20,
    ) {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.regs.sr = 0x2700 | ccr;

        let mut params = OpParams::new(size);
        params.target = Target::Data(reg);
        params.result = result;
        let flags = InstructionFlags::STORES_DATA | InstructionFlags::AND_SETS_CCR;
        store(&mut state, &params, flags).unwrap();

        prop_assert_eq!(state.regs.sr & CCR_MASK, ccr);
    }

    #[test]
    fn memory_store_then_load_sign_extends(
        size in sizes(),
        offset in 0u32..0x40,
        result in any::<u32>(),
    ) {
        let mut mem = FlatMemory::new(0x100, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        let addr = 0x80 + (offset & !1);

        let mut params = OpParams::new(size);
        params.target = Target::Memory;
        params.address = addr;
        params.result = result;
        store(&mut state, &params, InstructionFlags::STORES_DATA).unwrap();
        load(&mut state, &mut params).unwrap();

        prop_assert_eq!(params.second, sign_extend(result, size));
    }
}
