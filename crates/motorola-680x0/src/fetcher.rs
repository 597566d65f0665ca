//! Operand fetchers.
//!
//! Each fetcher resolves one operand of the current opcode. The suffix
//! names the opcode bits it reads (`_0007` is the effective-address field in
//! bits 5-0, `_0E00` the register field in bits 11-9, and so on).
//! Postincrement and predecrement side effects happen here, before the
//! microcode runs.

use crate::alu::{Size, sign_extend};
use crate::exceptions::Exception;
use crate::instruction::{OpParams, Target};
use crate::model::CpuModel;
use crate::state::ProcessorState;

/// A resolved effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Data(u8),
    Address(u8),
    /// Data-space memory.
    Memory(u32),
    /// PC-relative memory, read from program space.
    Program(u32),
    Immediate(u32),
}

fn reg_0007(opcode: u16) -> u8 {
    (opcode & 7) as u8
}

fn reg_0e00(opcode: u16) -> u8 {
    ((opcode >> 9) & 7) as u8
}

/// (An)+ and -(An) step: A7 stays word aligned for byte operands.
fn step(reg: u8, size: Size) -> u32 {
    if reg == 7 && size == Size::Byte { 2 } else { size.bytes() }
}

fn postincrement(state: &mut ProcessorState<'_>, reg: u8, size: Size) -> u32 {
    let addr = state.regs.a(reg as usize);
    state
        .regs
        .set_a(reg as usize, addr.wrapping_add(step(reg, size)));
    addr
}

fn predecrement(state: &mut ProcessorState<'_>, reg: u8, size: Size) -> u32 {
    let addr = state.regs.a(reg as usize).wrapping_sub(step(reg, size));
    state.regs.set_a(reg as usize, addr);
    addr
}

/// Index register contribution of an extension word.
fn index_value(state: &ProcessorState<'_>, ext: u16) -> u32 {
    let reg = state.regs.general(usize::from(ext >> 12));
    let value = if ext & 0x0800 != 0 {
        reg
    } else {
        sign_extend(reg, Size::Word)
    };
    if state.model >= CpuModel::M68020 {
        value << ((ext >> 9) & 3)
    } else {
        value
    }
}

/// Resolve an indexed mode. `base` is An, or the address of the extension
/// word for PC-relative modes. Returns the address and whether it came out
/// of a memory-indirect read.
fn indexed(
    state: &mut ProcessorState<'_>,
    base: u32,
    pc_relative: bool,
) -> Result<(u32, bool), Exception> {
    let ext = state.fetch_word()?;

    if ext & 0x0100 == 0 || state.model < CpuModel::M68020 {
        let disp = sign_extend(u32::from(ext), Size::Byte);
        return Ok((
            base.wrapping_add(disp).wrapping_add(index_value(state, ext)),
            false,
        ));
    }

    // Full format extension word.
    let base = if ext & 0x0080 != 0 { 0 } else { base };
    let index_suppressed = ext & 0x0040 != 0;
    let index = if index_suppressed {
        0
    } else {
        index_value(state, ext)
    };
    let bd = match (ext >> 4) & 3 {
        0 => return Err(Exception::IllegalInstruction),
        1 => 0,
        2 => sign_extend(u32::from(state.fetch_word()?), Size::Word),
        _ => state.fetch_long()?,
    };
    let iis = ext & 7;
    if iis == 0 {
        return Ok((base.wrapping_add(bd).wrapping_add(index), false));
    }
    if iis == 4 || (index_suppressed && iis > 4) {
        return Err(Exception::IllegalInstruction);
    }
    let post_indexed = iis > 4;
    let od = match iis & 3 {
        1 => 0,
        2 => sign_extend(u32::from(state.fetch_word()?), Size::Word),
        _ => state.fetch_long()?,
    };
    let fc = if pc_relative {
        state.program_space()
    } else {
        state.data_space()
    };
    let addr = if post_indexed {
        let pointer = state.read(base.wrapping_add(bd), Size::Long, fc)?;
        pointer.wrapping_add(index).wrapping_add(od)
    } else {
        let pointer = state.read(base.wrapping_add(bd).wrapping_add(index), Size::Long, fc)?;
        pointer.wrapping_add(od)
    };
    Ok((addr, true))
}

/// Resolve the 6-bit effective-address `field` for an operand of `size`.
pub fn resolve(
    state: &mut ProcessorState<'_>,
    field: u16,
    size: Size,
) -> Result<Location, Exception> {
    let reg = (field & 7) as u8;
    let location = match (field >> 3) & 7 {
        0 => Location::Data(reg),
        1 => Location::Address(reg),
        2 => Location::Memory(state.regs.a(reg as usize)),
        3 => Location::Memory(postincrement(state, reg, size)),
        4 => Location::Memory(predecrement(state, reg, size)),
        5 => {
            let disp = sign_extend(u32::from(state.fetch_word()?), Size::Word);
            Location::Memory(state.regs.a(reg as usize).wrapping_add(disp))
        }
        6 => {
            let base = state.regs.a(reg as usize);
            Location::Memory(indexed(state, base, false)?.0)
        }
        _ => match reg {
            0 => Location::Memory(sign_extend(u32::from(state.fetch_word()?), Size::Word)),
            1 => Location::Memory(state.fetch_long()?),
            2 => {
                let base = state.regs.pc;
                let disp = sign_extend(u32::from(state.fetch_word()?), Size::Word);
                Location::Program(base.wrapping_add(disp))
            }
            3 => {
                let base = state.regs.pc;
                match indexed(state, base, true)? {
                    (addr, false) => Location::Program(addr),
                    (addr, true) => Location::Memory(addr),
                }
            }
            4 => Location::Immediate(match size {
                Size::Byte => u32::from(state.fetch_word()?) & 0xFF,
                Size::Word => u32::from(state.fetch_word()?),
                Size::Long => state.fetch_long()?,
            }),
            _ => return Err(Exception::IllegalInstruction),
        },
    };
    Ok(location)
}

/// Read the operand at `location`, sign-extended to 32 bits.
pub fn read_location(
    state: &mut ProcessorState<'_>,
    location: Location,
    size: Size,
) -> Result<u32, Exception> {
    let raw = match location {
        Location::Data(n) => state.regs.d[n as usize],
        Location::Address(n) => state.regs.a(n as usize),
        Location::Memory(addr) => state.read_data(addr, size)?,
        Location::Program(addr) => {
            let fc = state.program_space();
            state.read(addr, size, fc)?
        }
        Location::Immediate(value) => value,
    };
    Ok(sign_extend(raw, size))
}

fn set_target(params: &mut OpParams, location: Location) -> Result<u32, Exception> {
    match location {
        Location::Data(n) => {
            params.target = Target::Data(n);
            Ok(u32::from(n))
        }
        Location::Address(n) => {
            params.target = Target::Address(n);
            Ok(u32::from(n))
        }
        Location::Memory(addr) => {
            params.target = Target::Memory;
            params.address = addr;
            Ok(addr)
        }
        Location::Program(_) | Location::Immediate(_) => Err(Exception::IllegalInstruction),
    }
}

fn control_address(location: Location) -> Result<u32, Exception> {
    match location {
        Location::Memory(addr) | Location::Program(addr) => Ok(addr),
        _ => Err(Exception::IllegalInstruction),
    }
}

/// Source operand from the effective address in bits 5-0.
pub fn fetch_source_0007(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let field = state.opcode & 0x3F;
    let location = resolve(state, field, params.size)?;
    read_location(state, location, params.size)
}

/// Destination from the effective address in bits 5-0.
pub fn fetch_target_0007(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let field = state.opcode & 0x3F;
    let location = resolve(state, field, params.size)?;
    set_target(params, location)
}

/// MOVE destination: register in bits 11-9, mode in bits 8-6.
pub fn fetch_target_0fc0(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let opcode = state.opcode;
    let field = ((opcode >> 3) & 0x38) | ((opcode >> 9) & 7);
    let location = resolve(state, field, params.size)?;
    set_target(params, location)
}

/// Control address from bits 5-0 (LEA, PEA, JMP, JSR).
pub fn fetch_address_0007(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let field = state.opcode & 0x3F;
    let location = resolve(state, field, params.size)?;
    control_address(location)
}

/// MOVEM base address. (An)+ and -(An) yield An unchanged; the microcode
/// steps and writes it back.
pub fn fetch_movem_address_0007(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let opcode = state.opcode;
    match (opcode >> 3) & 7 {
        3 | 4 => Ok(state.regs.a(reg_0007(opcode) as usize)),
        _ => fetch_address_0007(state, params),
    }
}

/// MOVEP address: d16(Ay).
pub fn fetch_displaced_address_0007(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    let base = state.regs.a(reg_0007(state.opcode) as usize);
    let disp = sign_extend(u32::from(state.fetch_word()?), Size::Word);
    Ok(base.wrapping_add(disp))
}

pub fn fetch_data_0e00(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(sign_extend(
        state.regs.d[reg_0e00(state.opcode) as usize],
        params.size,
    ))
}

pub fn fetch_data_0007(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(sign_extend(
        state.regs.d[reg_0007(state.opcode) as usize],
        params.size,
    ))
}

pub fn fetch_data_target_0e00(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let n = reg_0e00(state.opcode);
    params.target = Target::Data(n);
    Ok(u32::from(n))
}

pub fn fetch_data_target_0007(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let n = reg_0007(state.opcode);
    params.target = Target::Data(n);
    Ok(u32::from(n))
}

pub fn fetch_address_register_0e00(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(state.regs.a(reg_0e00(state.opcode) as usize))
}

pub fn fetch_address_register_0007(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(state.regs.a(reg_0007(state.opcode) as usize))
}

pub fn fetch_address_target_0e00(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let n = reg_0e00(state.opcode);
    params.target = Target::Address(n);
    Ok(u32::from(n))
}

/// (Ay)+ source (CMPM).
pub fn fetch_postinc_source_0007(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let reg = reg_0007(state.opcode);
    let addr = postincrement(state, reg, params.size);
    read_location(state, Location::Memory(addr), params.size)
}

/// (Ax)+ source (CMPM).
pub fn fetch_postinc_source_0e00(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let reg = reg_0e00(state.opcode);
    let addr = postincrement(state, reg, params.size);
    read_location(state, Location::Memory(addr), params.size)
}

/// -(Ay) source (ADDX, SUBX, ABCD, SBCD memory forms).
pub fn fetch_predec_source_0007(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let reg = reg_0007(state.opcode);
    let addr = predecrement(state, reg, params.size);
    read_location(state, Location::Memory(addr), params.size)
}

/// -(Ax) destination.
pub fn fetch_predec_target_0e00(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let reg = reg_0e00(state.opcode);
    let addr = predecrement(state, reg, params.size);
    set_target(params, Location::Memory(addr))
}

/// Immediate operand of the instruction's size, sign-extended.
pub fn fetch_immediate(
    state: &mut ProcessorState<'_>,
    params: &mut OpParams,
) -> Result<u32, Exception> {
    let value = match params.size {
        Size::Byte => u32::from(state.fetch_word()?) & 0xFF,
        Size::Word => u32::from(state.fetch_word()?),
        Size::Long => state.fetch_long()?,
    };
    Ok(sign_extend(value, params.size))
}

/// Immediate word, zero-extended (SR/CCR immediates, STOP).
pub fn fetch_immediate_word(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(u32::from(state.fetch_word()?))
}

/// Static bit number (BTST #n and friends).
pub fn fetch_bit_number(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(u32::from(state.fetch_word()? & 0xFF))
}

/// Raw extension word (MOVEM mask, MOVEC, MOVES, long multiply/divide).
pub fn fetch_extension(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(u32::from(state.fetch_word()?))
}

/// ADDQ/SUBQ data: 1-8, with 0 meaning 8.
pub fn fetch_quick_0e00(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    match reg_0e00(state.opcode) {
        0 => Ok(8),
        n => Ok(u32::from(n)),
    }
}

/// MOVEQ data.
pub fn fetch_signed_data_00ff(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(sign_extend(u32::from(state.opcode), Size::Byte))
}

/// Bcc/BRA/BSR target. An 8-bit displacement of 0 means a word follows;
/// 0xFF means a long follows on 68020+.
pub fn fetch_branch_target(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    let base = state.regs.pc;
    let disp = match state.opcode & 0xFF {
        0 => sign_extend(u32::from(state.fetch_word()?), Size::Word),
        0xFF if state.model >= CpuModel::M68020 => state.fetch_long()?,
        d => sign_extend(u32::from(d), Size::Byte),
    };
    Ok(base.wrapping_add(disp))
}

/// DBcc target.
pub fn fetch_word_branch_target(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    let base = state.regs.pc;
    let disp = sign_extend(u32::from(state.fetch_word()?), Size::Word);
    Ok(base.wrapping_add(disp))
}

pub fn fetch_displacement_word(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(sign_extend(u32::from(state.fetch_word()?), Size::Word))
}

pub fn fetch_displacement_long(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    state.fetch_long()
}

pub fn fetch_trap_vector_000f(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(u32::from(state.opcode & 0x0F))
}

/// Count of one for memory shifts.
pub fn fetch_one(
    _state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    Ok(1)
}

/// Register shift count: Dn modulo 64, or immediate 1-8.
pub fn fetch_shift_count_0e00(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    let n = reg_0e00(state.opcode);
    if state.opcode & 0x0020 != 0 {
        Ok(state.regs.d[n as usize] & 63)
    } else if n == 0 {
        Ok(8)
    } else {
        Ok(u32::from(n))
    }
}

/// TRAPcc operand word or long, consumed and returned.
pub fn fetch_trapcc_operand(
    state: &mut ProcessorState<'_>,
    _params: &mut OpParams,
) -> Result<u32, Exception> {
    match state.opcode & 7 {
        2 => Ok(u32::from(state.fetch_word()?)),
        3 => state.fetch_long(),
        _ => Ok(0),
    }
}
