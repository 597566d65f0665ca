//! Arithmetic: add/subtract family, compare, multiply, divide, BCD, CHK.

use super::{reg_0007, reg_0e00};
use crate::alu::{self, Size, merge, sign_extend};
use crate::exceptions::Exception;
use crate::flags::{C, N, Status, V, X, Z};
use crate::instruction::OpParams;
use crate::state::ProcessorState;

type Outcome = Result<(), Exception>;

pub fn add(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = alu::add(params.first, params.second, params.size, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

pub fn sub(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = alu::sub(params.first, params.second, params.size, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

/// ADDA and ADDQ to An: full 32-bit add, flags untouched.
pub fn adda(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = params.second.wrapping_add(params.first);
    Ok(())
}

pub fn suba(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = params.second.wrapping_sub(params.first);
    Ok(())
}

pub fn addx(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = alu::addx(params.first, params.second, params.size, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

pub fn subx(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = alu::subx(params.first, params.second, params.size, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

pub fn neg(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = alu::neg(params.second, params.size, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

pub fn negx(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = alu::negx(params.second, params.size, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

/// CMP, CMPI, CMPM: flags of `second - first`.
pub fn cmp(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.sr = alu::compare(params.first, params.second, params.size, state.regs.sr);
    Ok(())
}

/// CMPA: the source is already sign-extended, compare all 32 bits.
pub fn cmpa(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.sr = alu::compare(params.first, params.second, Size::Long, state.regs.sr);
    Ok(())
}

pub fn tst(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.sr = Status::logical(state.regs.sr, params.first, params.size);
    Ok(())
}

pub fn clr(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = 0;
    Ok(())
}

fn set_nz_clear_vc(state: &mut ProcessorState<'_>, negative: bool, zero: bool) {
    let mut sr = state.regs.sr & !(N | Z | V | C);
    if negative {
        sr |= N;
    }
    if zero {
        sr |= Z;
    }
    state.regs.sr = sr;
}

pub fn mulu(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let n = reg_0e00(state.opcode);
    let result = (state.regs.d[n] & 0xFFFF) * (params.first & 0xFFFF);
    state.regs.d[n] = result;
    set_nz_clear_vc(state, result & 0x8000_0000 != 0, result == 0);
    Ok(())
}

pub fn muls(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let n = reg_0e00(state.opcode);
    let result = i32::from(state.regs.d[n] as i16) * i32::from(params.first as i16);
    state.regs.d[n] = result as u32;
    set_nz_clear_vc(state, result < 0, result == 0);
    Ok(())
}

fn zero_divide(state: &mut ProcessorState<'_>) -> Outcome {
    state.regs.sr &= !C;
    Err(Exception::ZeroDivide)
}

fn divide_overflow(state: &mut ProcessorState<'_>) -> Outcome {
    state.regs.sr = (state.regs.sr | V) & !C;
    Ok(())
}

pub fn divu(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let n = reg_0e00(state.opcode);
    let divisor = params.first & 0xFFFF;
    if divisor == 0 {
        return zero_divide(state);
    }
    let dividend = state.regs.d[n];
    let quotient = dividend / divisor;
    if quotient > 0xFFFF {
        return divide_overflow(state);
    }
    let remainder = dividend % divisor;
    state.regs.d[n] = (remainder << 16) | quotient;
    set_nz_clear_vc(state, quotient & 0x8000 != 0, quotient == 0);
    Ok(())
}

pub fn divs(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let n = reg_0e00(state.opcode);
    let divisor = i32::from(params.first as i16);
    if divisor == 0 {
        return zero_divide(state);
    }
    let dividend = state.regs.d[n] as i32;
    let (Some(quotient), Some(remainder)) =
        (dividend.checked_div(divisor), dividend.checked_rem(divisor))
    else {
        return divide_overflow(state);
    };
    if i16::try_from(quotient).is_err() {
        return divide_overflow(state);
    }
    state.regs.d[n] = (u32::from(remainder as u16) << 16) | u32::from(quotient as u16);
    set_nz_clear_vc(state, quotient < 0, quotient == 0);
    Ok(())
}

/// MULU.L / MULS.L. `first` is the extension word, `second` the source.
pub fn mul_long(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let ext = params.first;
    let dl = ((ext >> 12) & 7) as usize;
    let dh = (ext & 7) as usize;
    let signed = ext & 0x0800 != 0;
    let wide = ext & 0x0400 != 0;

    let product: u64 = if signed {
        (i64::from(state.regs.d[dl] as i32) * i64::from(params.second as i32)) as u64
    } else {
        u64::from(state.regs.d[dl]) * u64::from(params.second)
    };
    let low = product as u32;

    if wide {
        state.regs.d[dh] = (product >> 32) as u32;
        state.regs.d[dl] = low;
        set_nz_clear_vc(state, product & (1 << 63) != 0, product == 0);
        return Ok(());
    }

    let overflow = if signed {
        i64::from(low as i32) != product as i64
    } else {
        product >> 32 != 0
    };
    state.regs.d[dl] = low;
    set_nz_clear_vc(state, low & 0x8000_0000 != 0, low == 0);
    if overflow {
        state.regs.sr |= V;
    }
    Ok(())
}

/// DIVU.L / DIVS.L / DIVUL.L / DIVSL.L. `first` is the extension word,
/// `second` the divisor.
pub fn div_long(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let ext = params.first;
    let dq = ((ext >> 12) & 7) as usize;
    let dr = (ext & 7) as usize;
    let signed = ext & 0x0800 != 0;
    let wide = ext & 0x0400 != 0;

    if params.second == 0 {
        return zero_divide(state);
    }

    let (quotient, remainder) = if signed {
        let dividend = if wide {
            ((u64::from(state.regs.d[dr]) << 32) | u64::from(state.regs.d[dq])) as i64
        } else {
            i64::from(state.regs.d[dq] as i32)
        };
        let divisor = i64::from(params.second as i32);
        let (Some(q), Some(r)) = (dividend.checked_div(divisor), dividend.checked_rem(divisor))
        else {
            return divide_overflow(state);
        };
        if i32::try_from(q).is_err() {
            return divide_overflow(state);
        }
        (q as u32, r as u32)
    } else {
        let dividend = if wide {
            (u64::from(state.regs.d[dr]) << 32) | u64::from(state.regs.d[dq])
        } else {
            u64::from(state.regs.d[dq])
        };
        let divisor = u64::from(params.second);
        let q = dividend / divisor;
        if q > u64::from(u32::MAX) {
            return divide_overflow(state);
        }
        (q as u32, (dividend % divisor) as u32)
    };

    if dr != dq {
        state.regs.d[dr] = remainder;
    }
    state.regs.d[dq] = quotient;
    set_nz_clear_vc(state, quotient & 0x8000_0000 != 0, quotient == 0);
    Ok(())
}

/// CHK: trap if Dn (in `second`) is negative or above the bound in `first`.
pub fn chk(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let value = params.second as i32;
    let bound = params.first as i32;
    let mut sr = state.regs.sr & !(V | C);
    sr = Status::set_if(sr, Z, value == 0);
    if value < 0 {
        state.regs.sr = sr | N;
        return Err(Exception::Chk);
    }
    if value > bound {
        state.regs.sr = sr & !N;
        return Err(Exception::Chk);
    }
    state.regs.sr = sr;
    Ok(())
}

fn bcd_flags(sr: u16, result: u32, carry: bool, overflow: bool) -> u16 {
    let mut sr = sr & !(X | N | V | C);
    if carry {
        sr |= X | C;
    }
    if overflow {
        sr |= V;
    }
    if result & 0x80 != 0 {
        sr |= N;
    }
    if result & 0xFF != 0 {
        sr &= !Z;
    }
    sr
}

/// Decimal add of two packed-BCD bytes with extend.
#[must_use]
pub fn bcd_add(src: u32, dst: u32, sr: u16) -> (u32, u16) {
    let x = u32::from(sr & X != 0);
    let mut res = (src & 0x0F) + (dst & 0x0F) + x;
    let before = !res;
    if res > 9 {
        res += 6;
    }
    res += (src & 0xF0) + (dst & 0xF0);
    let carry = res > 0x99;
    if carry {
        res -= 0xA0;
    }
    let overflow = before & res & 0x80 != 0;
    let res = res & 0xFF;
    (res, bcd_flags(sr, res, carry, overflow))
}

/// Decimal `dst - src - X` on packed-BCD bytes.
#[must_use]
pub fn bcd_sub(src: u32, dst: u32, sr: u16) -> (u32, u16) {
    let x = u32::from(sr & X != 0);
    let mut res = (dst & 0x0F).wrapping_sub(src & 0x0F).wrapping_sub(x);
    let before = !res;
    if res > 9 {
        res = res.wrapping_sub(6);
    }
    res = res.wrapping_add(dst & 0xF0).wrapping_sub(src & 0xF0);
    let carry = res > 0x99;
    if carry {
        res = res.wrapping_add(0xA0);
    }
    let res = res & 0xFF;
    let overflow = before & res & 0x80 != 0;
    (res, bcd_flags(sr, res, carry, overflow))
}

pub fn abcd(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = bcd_add(params.first & 0xFF, params.second & 0xFF, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

pub fn sbcd(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = bcd_sub(params.first & 0xFF, params.second & 0xFF, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

pub fn nbcd(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let (result, sr) = bcd_sub(params.second & 0xFF, 0, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

/// EXT.W, EXT.L and EXTB.L: sign-extend the low byte or word of Dn.
pub fn ext(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let from = if state.opcode & 0x01C0 == 0x00C0 {
        Size::Word
    } else {
        Size::Byte
    };
    params.result = sign_extend(params.second, from);
    Ok(())
}

/// TAS: flags from the original byte, then set bit 7.
pub fn tas(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    state.regs.sr = Status::logical(state.regs.sr, params.second, Size::Byte);
    params.result = params.second | 0x80;
    Ok(())
}

/// EXG: opmode 01000 is Dx,Dy; 01001 is Ax,Ay; 10001 is Dx,Ay.
pub fn exg(state: &mut ProcessorState<'_>, _params: &mut OpParams) -> Outcome {
    let opcode = state.opcode;
    let x = reg_0e00(opcode);
    let y = reg_0007(opcode);
    let regs = &mut state.regs;
    match (opcode >> 3) & 0x1F {
        0x08 => regs.d.swap(x, y),
        0x09 => {
            let ax = regs.a(x);
            regs.set_a(x, regs.a(y));
            regs.set_a(y, ax);
        }
        _ => {
            let dx = regs.d[x];
            regs.d[x] = regs.a(y);
            regs.set_a(y, dx);
        }
    }
    Ok(())
}

pub fn swap(_state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    params.result = params.second.rotate_left(16);
    Ok(())
}

/// Merge `value` into the low `size` bytes of Dn.
pub(crate) fn set_data(state: &mut ProcessorState<'_>, n: usize, value: u32, size: Size) {
    state.regs.d[n] = merge(state.regs.d[n], value, size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FlatMemory;
    use crate::model::CpuModel;

    #[test]
    fn bcd_add_carries_decimal() {
        let (result, sr) = bcd_add(0x15, 0x27, 0);
        assert_eq!(result, 0x42);
        assert_eq!(sr & (C | X), 0);
        let (result, sr) = bcd_add(0x55, 0x45, X | Z);
        assert_eq!(result, 0x01);
        assert_eq!(sr & (C | X), C | X);
        assert_eq!(sr & Z, 0);
    }

    #[test]
    fn bcd_sub_borrows_decimal() {
        let (result, _) = bcd_sub(0x15, 0x42, 0);
        assert_eq!(result, 0x27);
        let (result, sr) = bcd_sub(0x01, 0x00, 0);
        assert_eq!(result, 0x99);
        assert_eq!(sr & C, C);
    }

    #[test]
    fn zero_bcd_result_keeps_z() {
        let (result, sr) = bcd_sub(0, 0, Z);
        assert_eq!(result, 0);
        assert_ne!(sr & Z, 0);
    }

    #[test]
    fn divu_overflow_leaves_register() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.opcode = 0x80C1; // DIVU D1,D0
        state.regs.d[0] = 0x0010_0000;
        let mut params = OpParams::new(Size::Word);
        params.first = 1;
        divu(&mut state, &mut params).unwrap();
        assert_eq!(state.regs.d[0], 0x0010_0000);
        assert_ne!(state.regs.sr & V, 0);
    }

    #[test]
    fn divs_packs_remainder_and_quotient() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.opcode = 0x81C1; // DIVS D1,D0
        state.regs.d[0] = (-7i32) as u32;
        let mut params = OpParams::new(Size::Word);
        params.first = 2;
        divs(&mut state, &mut params).unwrap();
        assert_eq!(state.regs.d[0], 0xFFFF_FFFD);
        assert_ne!(state.regs.sr & N, 0);
    }

    #[test]
    fn divide_by_zero_traps() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.opcode = 0x80C1;
        let mut params = OpParams::new(Size::Word);
        assert_eq!(divu(&mut state, &mut params), Err(Exception::ZeroDivide));
    }

    #[test]
    fn long_multiply_into_register_pair() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68020, &mut mem);
        state.regs.d[1] = 0x8000_0000;
        let mut params = OpParams::new(Size::Long);
        // MULU.L D?,D2:D1
        params.first = 0x1402;
        params.second = 4;
        mul_long(&mut state, &mut params).unwrap();
        assert_eq!(state.regs.d[2], 2);
        assert_eq!(state.regs.d[1], 0);
        assert_eq!(state.regs.sr & V, 0);
    }

    #[test]
    fn long_divide_with_remainder_register() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68020, &mut mem);
        state.regs.d[1] = 100;
        let mut params = OpParams::new(Size::Long);
        // DIVUL.L D?,D2:D1
        params.first = 0x1002;
        params.second = 7;
        div_long(&mut state, &mut params).unwrap();
        assert_eq!(state.regs.d[1], 14);
        assert_eq!(state.regs.d[2], 2);
    }

    #[test]
    fn chk_sets_negative_for_lower_bound() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        let mut params = OpParams::new(Size::Word);
        params.first = 10;
        params.second = 0xFFFF_FFFF;
        assert_eq!(chk(&mut state, &mut params), Err(Exception::Chk));
        assert_ne!(state.regs.sr & N, 0);
        params.second = 11;
        assert_eq!(chk(&mut state, &mut params), Err(Exception::Chk));
        assert_eq!(state.regs.sr & N, 0);
        params.second = 10;
        assert_eq!(chk(&mut state, &mut params), Ok(()));
    }
}
