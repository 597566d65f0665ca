//! Instruction table: opcode word to fetchers, microcode, size and flags.
//!
//! [`decode`] is a pure function of the opcode; [`lookup`] caches its
//! result for all 65536 words in a table built on first use. Words with no
//! entry are illegal (line A and line F are told apart by the dispatcher).

use std::sync::OnceLock;

use crate::addressing::AddrMode;
use crate::alu::Size;
use crate::fetcher::{
    fetch_address_0007, fetch_address_register_0e00, fetch_address_target_0e00, fetch_bit_number,
    fetch_branch_target, fetch_data_0007, fetch_data_0e00, fetch_data_target_0007,
    fetch_data_target_0e00, fetch_displaced_address_0007, fetch_displacement_long,
    fetch_displacement_word, fetch_extension, fetch_immediate, fetch_immediate_word,
    fetch_movem_address_0007, fetch_one, fetch_postinc_source_0007, fetch_postinc_source_0e00,
    fetch_predec_source_0007, fetch_predec_target_0e00, fetch_quick_0e00, fetch_shift_count_0e00,
    fetch_signed_data_00ff, fetch_source_0007, fetch_target_0007, fetch_target_0fc0,
    fetch_trap_vector_000f, fetch_trapcc_operand, fetch_word_branch_target,
};
use crate::instruction::{Fetcher, Instruction, InstructionFlags, Microcode};
use crate::microcode::{arith, branches, logic, misc, moves, shifts};

const NO_FLAGS: InstructionFlags = InstructionFlags::NONE;
const STORES: InstructionFlags = InstructionFlags::STORES_DATA;
const STORES_CCR: InstructionFlags =
    InstructionFlags(InstructionFlags::STORES_DATA.0 | InstructionFlags::AND_SETS_CCR.0);
const RMW: InstructionFlags =
    InstructionFlags(InstructionFlags::LOADS_AND.0 | InstructionFlags::STORES_DATA.0);
const RMW_CCR: InstructionFlags = InstructionFlags(RMW.0 | InstructionFlags::AND_SETS_CCR.0);
const PRIVILEGED: InstructionFlags = InstructionFlags::PRIVILEGED;
const M68010: InstructionFlags = InstructionFlags::NOT_BEFORE_68010;
const M68020: InstructionFlags = InstructionFlags::NOT_BEFORE_68020;
const PRIVILEGED_68010: InstructionFlags =
    InstructionFlags(PRIVILEGED.0 | InstructionFlags::NOT_BEFORE_68010.0);

const NOTHING: &[Fetcher] = &[];
const SOURCE: &[Fetcher] = &[fetch_source_0007];
const TARGET: &[Fetcher] = &[fetch_target_0007];
const ADDRESS: &[Fetcher] = &[fetch_address_0007];
const MOVE: &[Fetcher] = &[fetch_source_0007, fetch_target_0fc0];
const SOURCE_TO_DATA: &[Fetcher] = &[fetch_source_0007, fetch_data_target_0e00];
const SOURCE_TO_ADDRESS: &[Fetcher] = &[fetch_source_0007, fetch_address_target_0e00];
const DATA_TO_TARGET: &[Fetcher] = &[fetch_data_0e00, fetch_target_0007];
const DATA_AND_SOURCE: &[Fetcher] = &[fetch_data_0e00, fetch_source_0007];
const SOURCE_AND_DATA: &[Fetcher] = &[fetch_source_0007, fetch_data_0e00];
const SOURCE_AND_ADDRESS: &[Fetcher] = &[fetch_source_0007, fetch_address_register_0e00];
const IMMEDIATE_TO_TARGET: &[Fetcher] = &[fetch_immediate, fetch_target_0007];
const IMMEDIATE_AND_SOURCE: &[Fetcher] = &[fetch_immediate, fetch_source_0007];
const IMMEDIATE_WORD: &[Fetcher] = &[fetch_immediate_word];
const QUICK_TO_TARGET: &[Fetcher] = &[fetch_quick_0e00, fetch_target_0007];
const REGISTER_PAIR: &[Fetcher] = &[fetch_data_0007, fetch_data_target_0e00];
const PREDECREMENT_PAIR: &[Fetcher] = &[fetch_predec_source_0007, fetch_predec_target_0e00];
const POSTINCREMENT_PAIR: &[Fetcher] = &[fetch_postinc_source_0007, fetch_postinc_source_0e00];
const BIT_TO_TARGET: &[Fetcher] = &[fetch_bit_number, fetch_target_0007];
const BIT_AND_SOURCE: &[Fetcher] = &[fetch_bit_number, fetch_source_0007];
const LEA: &[Fetcher] = &[fetch_address_0007, fetch_address_target_0e00];
const MOVEQ: &[Fetcher] = &[fetch_signed_data_00ff, fetch_data_target_0e00];
const DATA_REGISTER: &[Fetcher] = &[fetch_data_target_0007];
const MOVEM: &[Fetcher] = &[fetch_extension, fetch_movem_address_0007];
const MOVEP: &[Fetcher] = &[fetch_displaced_address_0007];
const EXTENSION: &[Fetcher] = &[fetch_extension];
const EXTENSION_AND_SOURCE: &[Fetcher] = &[fetch_extension, fetch_source_0007];
const EXTENSION_TO_TARGET: &[Fetcher] = &[fetch_extension, fetch_target_0007];
const BRANCH: &[Fetcher] = &[fetch_branch_target];
const DBCC: &[Fetcher] = &[fetch_word_branch_target];
const DISPLACEMENT_WORD: &[Fetcher] = &[fetch_displacement_word];
const DISPLACEMENT_LONG: &[Fetcher] = &[fetch_displacement_long];
const TRAP: &[Fetcher] = &[fetch_trap_vector_000f];
const TRAPCC: &[Fetcher] = &[fetch_trapcc_operand];
const SHIFT_REGISTER: &[Fetcher] = &[fetch_shift_count_0e00, fetch_data_target_0007];
const SHIFT_MEMORY: &[Fetcher] = &[fetch_one, fetch_target_0007];

fn entry(
    fetch: &'static [Fetcher],
    code: Microcode,
    size: Size,
    flags: InstructionFlags,
) -> Option<Instruction> {
    Some(Instruction::new(fetch, code, size, flags))
}

fn size_0c0(opcode: u16) -> Option<Size> {
    Size::from_bits(opcode >> 6)
}

/// Mode value of an effective-address field, for quick register checks.
fn mode(opcode: u16) -> u16 {
    (opcode >> 3) & 7
}

/// Any valid mode; An only for word and long.
fn any_for(ea: AddrMode, size: Size) -> bool {
    !(matches!(ea, AddrMode::AddrReg(_)) && size == Size::Byte)
}

/// Decode one opcode word.
#[must_use]
pub fn decode(opcode: u16) -> Option<Instruction> {
    match opcode >> 12 {
        0x0 => decode_bits_and_immediates(opcode),
        0x1..=0x3 => decode_move(opcode),
        0x4 => decode_miscellaneous(opcode),
        0x5 => decode_quick_and_conditions(opcode),
        0x6 => decode_branch(opcode),
        0x7 => decode_moveq(opcode),
        0x8 => decode_or_divide(opcode),
        0x9 => decode_add_sub(opcode, false),
        0xB => decode_compare_eor(opcode),
        0xC => decode_and_multiply(opcode),
        0xD => decode_add_sub(opcode, true),
        0xE => decode_shift(opcode),
        _ => None,
    }
}

static TABLE: OnceLock<Box<[Option<Instruction>]>> = OnceLock::new();

/// Table lookup for the dispatcher.
#[must_use]
pub fn lookup(opcode: u16) -> Option<Instruction> {
    TABLE.get_or_init(|| (0..=u16::MAX).map(decode).collect())[usize::from(opcode)]
}

fn decode_bits_and_immediates(opcode: u16) -> Option<Instruction> {
    let ea = AddrMode::from_ea(opcode);

    if opcode & 0x0100 != 0 {
        if mode(opcode) == 1 {
            let size = if opcode & 0x0040 != 0 { Size::Long } else { Size::Word };
            return entry(MOVEP, moves::movep, size, NO_FLAGS);
        }
        // Dynamic bit number in Dn.
        let ea = ea?;
        let size = if matches!(ea, AddrMode::DataReg(_)) { Size::Long } else { Size::Byte };
        return match (opcode >> 6) & 3 {
            0 if ea.is_data() => entry(DATA_AND_SOURCE, logic::btst, size, NO_FLAGS),
            1 if ea.is_data_alterable() => entry(DATA_TO_TARGET, logic::bchg, size, RMW_CCR),
            2 if ea.is_data_alterable() => entry(DATA_TO_TARGET, logic::bclr, size, RMW_CCR),
            3 if ea.is_data_alterable() => entry(DATA_TO_TARGET, logic::bset, size, RMW_CCR),
            _ => None,
        };
    }

    let kind = (opcode >> 9) & 7;

    if kind == 4 {
        // Static bit number in an extension word.
        let ea = ea?;
        let size = if matches!(ea, AddrMode::DataReg(_)) { Size::Long } else { Size::Byte };
        return match (opcode >> 6) & 3 {
            0 if ea.is_data() && ea != AddrMode::Immediate => {
                entry(BIT_AND_SOURCE, logic::btst, size, NO_FLAGS)
            }
            1 if ea.is_data_alterable() => entry(BIT_TO_TARGET, logic::bchg, size, RMW_CCR),
            2 if ea.is_data_alterable() => entry(BIT_TO_TARGET, logic::bclr, size, RMW_CCR),
            3 if ea.is_data_alterable() => entry(BIT_TO_TARGET, logic::bset, size, RMW_CCR),
            _ => None,
        };
    }

    let size = size_0c0(opcode)?;

    if kind == 7 {
        let ea = ea?;
        return if ea.is_memory_alterable() {
            entry(EXTENSION_TO_TARGET, misc::moves, size, PRIVILEGED_68010)
        } else {
            None
        };
    }

    // ORI, ANDI and EORI to CCR/SR.
    if opcode & 0x3F == 0x3C && matches!(kind, 0 | 1 | 5) {
        let (ccr, sr): (Microcode, Microcode) = match kind {
            0 => (logic::or_to_ccr, logic::or_to_sr),
            1 => (logic::and_to_ccr, logic::and_to_sr),
            _ => (logic::eor_to_ccr, logic::eor_to_sr),
        };
        return match size {
            Size::Byte => entry(IMMEDIATE_WORD, ccr, Size::Byte, NO_FLAGS),
            Size::Word => entry(IMMEDIATE_WORD, sr, Size::Word, PRIVILEGED),
            Size::Long => None,
        };
    }

    let ea = ea?;
    match kind {
        0 if ea.is_data_alterable() => entry(IMMEDIATE_TO_TARGET, logic::or, size, RMW),
        1 if ea.is_data_alterable() => entry(IMMEDIATE_TO_TARGET, logic::and, size, RMW),
        2 if ea.is_data_alterable() => entry(IMMEDIATE_TO_TARGET, arith::sub, size, RMW_CCR),
        3 if ea.is_data_alterable() => entry(IMMEDIATE_TO_TARGET, arith::add, size, RMW_CCR),
        5 if ea.is_data_alterable() => entry(IMMEDIATE_TO_TARGET, logic::eor, size, RMW),
        6 if ea.is_data_alterable() => entry(IMMEDIATE_AND_SOURCE, arith::cmp, size, NO_FLAGS),
        6 if matches!(ea, AddrMode::PcDisp | AddrMode::PcIndex) => {
            entry(IMMEDIATE_AND_SOURCE, arith::cmp, size, M68020)
        }
        _ => None,
    }
}

fn decode_move(opcode: u16) -> Option<Instruction> {
    let size = Size::from_move_bits(opcode >> 12)?;
    let source = AddrMode::from_ea(opcode)?;
    let destination = AddrMode::from_move_destination(opcode)?;
    if !any_for(source, size) {
        return None;
    }
    match destination {
        AddrMode::AddrReg(_) if size != Size::Byte => {
            entry(SOURCE_TO_ADDRESS, moves::move_, size, STORES)
        }
        d if d.is_data_alterable() => entry(MOVE, moves::move_, size, STORES),
        _ => None,
    }
}

fn decode_miscellaneous(opcode: u16) -> Option<Instruction> {
    let ea = AddrMode::from_ea(opcode);

    if opcode & 0x0100 != 0 {
        if opcode & 0x0FF8 == 0x09C0 {
            return entry(DATA_REGISTER, arith::ext, Size::Long, RMW | M68020);
        }
        let ea = ea?;
        return match opcode & 0x01C0 {
            0x01C0 if ea.is_control() => entry(LEA, moves::move_, Size::Long, STORES),
            0x0180 if ea.is_data() => entry(SOURCE_AND_DATA, arith::chk, Size::Word, NO_FLAGS),
            0x0100 if ea.is_data() => entry(SOURCE_AND_DATA, arith::chk, Size::Long, M68020),
            _ => None,
        };
    }

    match (opcode >> 8) & 0x0F {
        0x0 | 0x2 | 0x4 | 0x6 => decode_single_operand(opcode, ea?),
        0x8 => decode_line_48(opcode, ea),
        0xA => {
            if opcode == 0x4AFC {
                return entry(NOTHING, branches::illegal, Size::Word, NO_FLAGS);
            }
            let ea = ea?;
            match size_0c0(opcode) {
                None if ea.is_data_alterable() => entry(TARGET, arith::tas, Size::Byte, RMW_CCR),
                None => None,
                Some(size) if ea.is_data_alterable() => entry(SOURCE, arith::tst, size, NO_FLAGS),
                Some(size) if any_for(ea, size) => entry(SOURCE, arith::tst, size, M68020),
                Some(_) => None,
            }
        }
        0xC => {
            let ea = ea?;
            match opcode & 0x00C0 {
                0x0000 if ea.is_data() => {
                    entry(EXTENSION_AND_SOURCE, arith::mul_long, Size::Long, M68020)
                }
                0x0040 if ea.is_data() => {
                    entry(EXTENSION_AND_SOURCE, arith::div_long, Size::Long, M68020)
                }
                0x0080 | 0x00C0
                    if ea.is_control() || matches!(ea, AddrMode::AddrIndPostInc(_)) =>
                {
                    let size = if opcode & 0x0040 != 0 { Size::Long } else { Size::Word };
                    entry(MOVEM, moves::movem_to_registers, size, NO_FLAGS)
                }
                _ => None,
            }
        }
        0xE => decode_line_4e(opcode, ea),
        _ => None,
    }
}

/// NEGX, CLR, NEG, NOT and the SR/CCR moves sharing their opcode space.
fn decode_single_operand(opcode: u16, ea: AddrMode) -> Option<Instruction> {
    let group = (opcode >> 9) & 3;
    let Some(size) = size_0c0(opcode) else {
        return match group {
            0 if ea.is_data_alterable() => entry(
                TARGET,
                moves::move_from_sr,
                Size::Word,
                STORES_CCR | InstructionFlags::PRIVILEGED_EXCEPT_ON_68000,
            ),
            1 if ea.is_data_alterable() => {
                entry(TARGET, moves::move_from_ccr, Size::Word, STORES_CCR | M68010)
            }
            2 if ea.is_data() => entry(SOURCE, moves::move_to_ccr, Size::Word, NO_FLAGS),
            3 if ea.is_data() => entry(SOURCE, moves::move_to_sr, Size::Word, PRIVILEGED),
            _ => None,
        };
    };
    if !ea.is_data_alterable() {
        return None;
    }
    match group {
        0 => entry(TARGET, arith::negx, size, RMW_CCR),
        1 => entry(TARGET, arith::clr, size, STORES),
        2 => entry(TARGET, arith::neg, size, RMW_CCR),
        _ => entry(TARGET, logic::not, size, RMW),
    }
}

/// 0x48xx: NBCD, SWAP, PEA, BKPT, LINK.L, EXT and MOVEM to memory.
fn decode_line_48(opcode: u16, ea: Option<AddrMode>) -> Option<Instruction> {
    match opcode & 0x00F8 {
        0x08 => return entry(DISPLACEMENT_LONG, misc::link, Size::Long, M68020),
        0x40 => return entry(DATA_REGISTER, arith::swap, Size::Long, RMW),
        0x48 => return entry(NOTHING, branches::illegal, Size::Word, M68010),
        0x80 => return entry(DATA_REGISTER, arith::ext, Size::Word, RMW),
        0xC0 => return entry(DATA_REGISTER, arith::ext, Size::Long, RMW),
        _ => {}
    }
    let ea = ea?;
    match opcode & 0x00C0 {
        0x00 if ea.is_data_alterable() => entry(TARGET, arith::nbcd, Size::Byte, RMW_CCR),
        0x40 if ea.is_control() => entry(ADDRESS, moves::pea, Size::Long, NO_FLAGS),
        0x80 | 0xC0
            if ea.is_control_alterable() || matches!(ea, AddrMode::AddrIndPreDec(_)) =>
        {
            let size = if opcode & 0x0040 != 0 { Size::Long } else { Size::Word };
            entry(MOVEM, moves::movem_to_memory, size, NO_FLAGS)
        }
        _ => None,
    }
}

/// 0x4Exx: system control, TRAP, LINK/UNLK, MOVE USP, JSR and JMP.
fn decode_line_4e(opcode: u16, ea: Option<AddrMode>) -> Option<Instruction> {
    match opcode {
        0x4E70 => return entry(NOTHING, misc::reset, Size::Word, PRIVILEGED),
        0x4E71 => return entry(NOTHING, misc::nop, Size::Word, NO_FLAGS),
        0x4E72 => return entry(IMMEDIATE_WORD, misc::stop, Size::Word, PRIVILEGED),
        0x4E73 => return entry(NOTHING, branches::rte, Size::Word, PRIVILEGED),
        0x4E74 => return entry(DISPLACEMENT_WORD, branches::rtd, Size::Word, M68010),
        0x4E75 => return entry(NOTHING, branches::rts, Size::Word, NO_FLAGS),
        0x4E76 => return entry(NOTHING, branches::trapv, Size::Word, NO_FLAGS),
        0x4E77 => return entry(NOTHING, branches::rtr, Size::Word, NO_FLAGS),
        0x4E7A | 0x4E7B => return entry(EXTENSION, misc::movec, Size::Long, PRIVILEGED_68010),
        _ => {}
    }
    match opcode & 0x00F8 {
        0x40 | 0x48 => return entry(TRAP, branches::trap, Size::Word, NO_FLAGS),
        0x50 => return entry(DISPLACEMENT_WORD, misc::link, Size::Word, NO_FLAGS),
        0x58 => return entry(NOTHING, misc::unlk, Size::Long, NO_FLAGS),
        0x60 | 0x68 => return entry(NOTHING, misc::move_usp, Size::Long, PRIVILEGED),
        _ => {}
    }
    let ea = ea?;
    match opcode & 0x00C0 {
        0x80 if ea.is_control() => entry(ADDRESS, branches::jsr, Size::Long, NO_FLAGS),
        0xC0 if ea.is_control() => entry(ADDRESS, branches::jmp, Size::Long, NO_FLAGS),
        _ => None,
    }
}

fn decode_quick_and_conditions(opcode: u16) -> Option<Instruction> {
    let Some(size) = size_0c0(opcode) else {
        return match opcode & 0x3F {
            0x08..=0x0F => entry(DBCC, branches::dbcc, Size::Word, NO_FLAGS),
            0x3A..=0x3C => entry(TRAPCC, branches::trapcc, Size::Word, M68020),
            _ => {
                let ea = AddrMode::from_ea(opcode)?;
                if ea.is_data_alterable() {
                    entry(TARGET, branches::scc, Size::Byte, STORES_CCR)
                } else {
                    None
                }
            }
        };
    };
    let ea = AddrMode::from_ea(opcode)?;
    let subtract = opcode & 0x0100 != 0;
    match ea {
        AddrMode::AddrReg(_) if size != Size::Byte => {
            let code = if subtract { arith::suba } else { arith::adda };
            entry(QUICK_TO_TARGET, code, size, RMW)
        }
        ea if ea.is_data_alterable() => {
            let code = if subtract { arith::sub } else { arith::add };
            entry(QUICK_TO_TARGET, code, size, RMW_CCR)
        }
        _ => None,
    }
}

fn decode_branch(opcode: u16) -> Option<Instruction> {
    let code = if (opcode >> 8) & 0x0F == 1 {
        branches::bsr
    } else {
        branches::bcc
    };
    entry(BRANCH, code, Size::Word, NO_FLAGS)
}

fn decode_moveq(opcode: u16) -> Option<Instruction> {
    if opcode & 0x0100 != 0 {
        return None;
    }
    entry(MOVEQ, moves::move_, Size::Long, STORES)
}

/// BCD register/memory pair forms share bits 8-4 = 10000 in lines 8 and C.
fn decode_bcd(opcode: u16, code: Microcode) -> Option<Instruction> {
    let fetch = if opcode & 0x0008 != 0 {
        PREDECREMENT_PAIR
    } else {
        REGISTER_PAIR
    };
    entry(fetch, code, Size::Byte, RMW_CCR)
}

fn decode_or_divide(opcode: u16) -> Option<Instruction> {
    let ea = AddrMode::from_ea(opcode);
    match (opcode >> 6) & 7 {
        3 if ea?.is_data() => entry(SOURCE, arith::divu, Size::Word, NO_FLAGS),
        7 if ea?.is_data() => entry(SOURCE, arith::divs, Size::Word, NO_FLAGS),
        4 if mode(opcode) <= 1 => decode_bcd(opcode, arith::sbcd),
        opmode @ 0..=2 if ea?.is_data() => {
            entry(SOURCE_TO_DATA, logic::or, size_0c0(opmode << 6)?, RMW)
        }
        opmode @ 4..=6 if ea?.is_memory_alterable() => {
            entry(DATA_TO_TARGET, logic::or, size_0c0(opmode << 6)?, RMW)
        }
        _ => None,
    }
}

fn decode_and_multiply(opcode: u16) -> Option<Instruction> {
    let ea = AddrMode::from_ea(opcode);
    match opcode & 0x01F8 {
        0x0100 | 0x0108 => return decode_bcd(opcode, arith::abcd),
        0x0140 | 0x0148 | 0x0188 => return entry(NOTHING, arith::exg, Size::Long, NO_FLAGS),
        _ => {}
    }
    match (opcode >> 6) & 7 {
        3 if ea?.is_data() => entry(SOURCE, arith::mulu, Size::Word, NO_FLAGS),
        7 if ea?.is_data() => entry(SOURCE, arith::muls, Size::Word, NO_FLAGS),
        opmode @ 0..=2 if ea?.is_data() => {
            entry(SOURCE_TO_DATA, logic::and, size_0c0(opmode << 6)?, RMW)
        }
        opmode @ 4..=6 if ea?.is_memory_alterable() => {
            entry(DATA_TO_TARGET, logic::and, size_0c0(opmode << 6)?, RMW)
        }
        _ => None,
    }
}

/// Lines 9 (SUB) and D (ADD).
fn decode_add_sub(opcode: u16, add: bool) -> Option<Instruction> {
    let ea = AddrMode::from_ea(opcode)?;
    let opmode = (opcode >> 6) & 7;
    let (plain, address, extended): (Microcode, Microcode, Microcode) = if add {
        (arith::add, arith::adda, arith::addx)
    } else {
        (arith::sub, arith::suba, arith::subx)
    };
    match opmode {
        3 | 7 => {
            let size = if opmode == 7 { Size::Long } else { Size::Word };
            entry(SOURCE_TO_ADDRESS, address, size, RMW)
        }
        0..=2 => {
            let size = size_0c0(opmode << 6)?;
            if any_for(ea, size) {
                entry(SOURCE_TO_DATA, plain, size, RMW_CCR)
            } else {
                None
            }
        }
        _ => {
            let size = size_0c0(opmode << 6)?;
            match mode(opcode) {
                0 => entry(REGISTER_PAIR, extended, size, RMW_CCR),
                1 => entry(PREDECREMENT_PAIR, extended, size, RMW_CCR),
                _ if ea.is_memory_alterable() => entry(DATA_TO_TARGET, plain, size, RMW_CCR),
                _ => None,
            }
        }
    }
}

fn decode_compare_eor(opcode: u16) -> Option<Instruction> {
    let ea = AddrMode::from_ea(opcode)?;
    let opmode = (opcode >> 6) & 7;
    match opmode {
        3 => entry(SOURCE_AND_ADDRESS, arith::cmpa, Size::Word, NO_FLAGS),
        7 => entry(SOURCE_AND_ADDRESS, arith::cmpa, Size::Long, NO_FLAGS),
        0..=2 => {
            let size = size_0c0(opmode << 6)?;
            if any_for(ea, size) {
                entry(SOURCE_AND_DATA, arith::cmp, size, NO_FLAGS)
            } else {
                None
            }
        }
        _ => {
            let size = size_0c0(opmode << 6)?;
            if mode(opcode) == 1 {
                entry(POSTINCREMENT_PAIR, arith::cmp, size, NO_FLAGS)
            } else if ea.is_data_alterable() {
                entry(DATA_TO_TARGET, logic::eor, size, RMW)
            } else {
                None
            }
        }
    }
}

fn shift_code(kind: u16) -> Microcode {
    match kind & 3 {
        0 => shifts::asd,
        1 => shifts::lsd,
        2 => shifts::roxd,
        _ => shifts::rod,
    }
}

fn decode_shift(opcode: u16) -> Option<Instruction> {
    match size_0c0(opcode) {
        Some(size) => entry(SHIFT_REGISTER, shift_code(opcode >> 3), size, RMW_CCR),
        None => {
            if opcode & 0x0800 != 0 {
                return None;
            }
            let ea = AddrMode::from_ea(opcode)?;
            if ea.is_memory_alterable() {
                entry(SHIFT_MEMORY, shift_code(opcode >> 9), Size::Word, RMW_CCR)
            } else {
                None
            }
        }
    }
}
