//! Operand sizes and shared ALU operations with flag computation.
//!
//! Operands travel through the interpreter sign-extended to 32 bits (see
//! [`sign_extend`]). The arithmetic helpers mask to the operand size before
//! computing, and return the result together with the updated status
//! register.

use crate::flags::{C, N, V, X, Z};

/// Operation size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Size {
    /// 8-bit byte.
    Byte,
    /// 16-bit word.
    Word,
    /// 32-bit long.
    Long,
}

impl Size {
    /// Get size from the standard 2-bit encoding (00=byte, 01=word, 10=long).
    #[must_use]
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits & 0x03 {
            0 => Some(Self::Byte),
            1 => Some(Self::Word),
            2 => Some(Self::Long),
            _ => None,
        }
    }

    /// Get size from the MOVE encoding (01=byte, 11=word, 10=long).
    #[must_use]
    pub fn from_move_bits(bits: u16) -> Option<Self> {
        match bits & 0x03 {
            1 => Some(Self::Byte),
            3 => Some(Self::Word),
            2 => Some(Self::Long),
            _ => None,
        }
    }

    /// Number of bytes for this size.
    #[must_use]
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
            Self::Long => 4,
        }
    }

    /// Number of bits for this size.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bytes() * 8
    }

    /// MSB mask for this size.
    #[must_use]
    pub const fn msb_mask(self) -> u32 {
        match self {
            Self::Byte => 0x80,
            Self::Word => 0x8000,
            Self::Long => 0x8000_0000,
        }
    }

    /// Value mask for this size.
    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Self::Byte => 0xFF,
            Self::Word => 0xFFFF,
            Self::Long => 0xFFFF_FFFF,
        }
    }
}

/// Widen a byte or word to the signed 32-bit representation.
///
/// Longs are returned unchanged.
#[must_use]
pub const fn sign_extend(value: u32, size: Size) -> u32 {
    match size {
        Size::Byte => value as u8 as i8 as i32 as u32,
        Size::Word => value as u16 as i16 as i32 as u32,
        Size::Long => value,
    }
}

/// Overwrite the low-order bytes of `old` selected by `size` with `new`.
///
/// This is how byte and word results land in a data register: the upper
/// bytes of the register are preserved.
#[must_use]
pub const fn merge(old: u32, new: u32, size: Size) -> u32 {
    let mask = size.mask();
    (old & !mask) | (new & mask)
}

/// Add with flags (used by ADD, ADDI, ADDQ).
///
/// Returns (result, `updated_sr`).
#[must_use]
pub fn add(src: u32, dst: u32, size: Size, sr: u16) -> (u32, u16) {
    let mask = size.mask();
    let msb = size.msb_mask();
    let s = src & mask;
    let d = dst & mask;
    let result = s.wrapping_add(d) & mask;

    let mut flags = sr & !(C | V | Z | N | X);
    if result == 0 {
        flags |= Z;
    }
    if result & msb != 0 {
        flags |= N;
    }
    let carry = (s & d) | ((s | d) & !result);
    if carry & msb != 0 {
        flags |= C | X;
    }
    let overflow = (s ^ result) & (d ^ result);
    if overflow & msb != 0 {
        flags |= V;
    }

    (result, flags)
}

/// Subtract with flags (used by SUB, SUBI, SUBQ).
///
/// Computes dst - src. Returns (result, `updated_sr`).
#[must_use]
pub fn sub(src: u32, dst: u32, size: Size, sr: u16) -> (u32, u16) {
    let mask = size.mask();
    let msb = size.msb_mask();
    let s = src & mask;
    let d = dst & mask;
    let result = d.wrapping_sub(s) & mask;

    let mut flags = sr & !(C | V | Z | N | X);
    if result == 0 {
        flags |= Z;
    }
    if result & msb != 0 {
        flags |= N;
    }
    let borrow = (!d & s) | ((!d | s) & result);
    if borrow & msb != 0 {
        flags |= C | X;
    }
    let overflow = (s ^ d) & (result ^ d);
    if overflow & msb != 0 {
        flags |= V;
    }

    (result, flags)
}

/// Compare (CMP, CMPA, CMPI, CMPM): flags of dst - src, X untouched.
#[must_use]
pub fn compare(src: u32, dst: u32, size: Size, sr: u16) -> u16 {
    let (_, flags) = sub(src, dst, size, sr);
    (flags & !X) | (sr & X)
}

/// Add with extend (ADDX): dst + src + X.
///
/// Z is only cleared, never set, so multi-precision chains test the whole
/// value.
#[must_use]
pub fn addx(src: u32, dst: u32, size: Size, sr: u16) -> (u32, u16) {
    let mask = size.mask();
    let msb = size.msb_mask();
    let x_in = u32::from(sr & X != 0);
    let s = src & mask;
    let d = dst & mask;
    let result = s.wrapping_add(d).wrapping_add(x_in) & mask;

    let mut flags = sr & !(C | V | N | X);
    if result != 0 {
        flags &= !Z;
    }
    if result & msb != 0 {
        flags |= N;
    }
    let carry = (s & d) | ((s | d) & !result);
    if carry & msb != 0 {
        flags |= C | X;
    }
    let overflow = (s ^ result) & (d ^ result);
    if overflow & msb != 0 {
        flags |= V;
    }

    (result, flags)
}

/// Subtract with extend (SUBX): dst - src - X.
///
/// Z is only cleared, never set.
#[must_use]
pub fn subx(src: u32, dst: u32, size: Size, sr: u16) -> (u32, u16) {
    let mask = size.mask();
    let msb = size.msb_mask();
    let x_in = u32::from(sr & X != 0);
    let s = src & mask;
    let d = dst & mask;
    let result = d.wrapping_sub(s).wrapping_sub(x_in) & mask;

    let mut flags = sr & !(C | V | N | X);
    if result != 0 {
        flags &= !Z;
    }
    if result & msb != 0 {
        flags |= N;
    }
    let borrow = (!d & s) | ((!d | s) & result);
    if borrow & msb != 0 {
        flags |= C | X;
    }
    let overflow = (s ^ d) & (result ^ d);
    if overflow & msb != 0 {
        flags |= V;
    }

    (result, flags)
}

/// Negate with flags (NEG): 0 - dst.
#[must_use]
pub fn neg(dst: u32, size: Size, sr: u16) -> (u32, u16) {
    sub(dst, 0, size, sr)
}

/// Negate with extend (NEGX): 0 - dst - X.
#[must_use]
pub fn negx(dst: u32, size: Size, sr: u16) -> (u32, u16) {
    subx(dst, 0, size, sr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_extend_widens_negative_bytes_and_words() {
        assert_eq!(sign_extend(0x80, Size::Byte), 0xFFFF_FF80);
        assert_eq!(sign_extend(0x1234_007F, Size::Byte), 0x7F);
        assert_eq!(sign_extend(0x8000, Size::Word), 0xFFFF_8000);
        assert_eq!(sign_extend(0xDEAD_BEEF, Size::Long), 0xDEAD_BEEF);
    }

    #[test]
    fn merge_preserves_upper_bytes() {
        assert_eq!(merge(0x1234_5678, 0xFFFF_FFAB, Size::Byte), 0x1234_56AB);
        assert_eq!(merge(0x1234_5678, 0xABCD, Size::Word), 0x1234_ABCD);
        assert_eq!(merge(0x1234_5678, 0xCAFE_F00D, Size::Long), 0xCAFE_F00D);
    }

    #[test]
    fn add_sets_carry_and_extend_on_wrap() {
        let (result, sr) = add(1, 0xFF, Size::Byte, 0);
        assert_eq!(result, 0);
        assert_eq!(sr & (C | X | Z), C | X | Z);
        assert_eq!(sr & V, 0);
    }

    #[test]
    fn add_sets_overflow_on_signed_wrap() {
        let (result, sr) = add(1, 0x7FFF, Size::Word, 0);
        assert_eq!(result, 0x8000);
        assert_eq!(sr & (V | N), V | N);
        assert_eq!(sr & C, 0);
    }

    #[test]
    fn sub_borrows() {
        let (result, sr) = sub(1, 0, Size::Long, 0);
        assert_eq!(result, 0xFFFF_FFFF);
        assert_eq!(sr & (C | X | N), C | X | N);
    }

    #[test]
    fn compare_leaves_extend_alone() {
        let sr = compare(1, 0, Size::Byte, X);
        assert_ne!(sr & X, 0);
        let sr = compare(1, 0, Size::Byte, 0);
        assert_eq!(sr & X, 0);
        assert_ne!(sr & C, 0);
    }

    #[test]
    fn addx_never_sets_zero() {
        let (result, sr) = addx(0, 0, Size::Word, 0);
        assert_eq!(result, 0);
        assert_eq!(sr & Z, 0);
        let (_, sr) = addx(0, 0, Size::Word, Z);
        assert_ne!(sr & Z, 0);
        let (result, sr) = addx(0, 0, Size::Word, X | Z);
        assert_eq!(result, 1);
        assert_eq!(sr & Z, 0);
    }

    #[test]
    fn neg_of_minimum_overflows() {
        let (result, sr) = neg(0x80, Size::Byte, 0);
        assert_eq!(result, 0x80);
        assert_eq!(sr & (V | C | N), V | C | N);
    }
}
