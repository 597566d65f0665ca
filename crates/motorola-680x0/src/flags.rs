//! 680x0 status register flags.
//!
//! The status register is 16 bits:
//! - Bits 0-4: Condition code register (CCR)
//!   - C (bit 0): Carry
//!   - V (bit 1): Overflow
//!   - Z (bit 2): Zero
//!   - N (bit 3): Negative
//!   - X (bit 4): Extend (copy of C for multi-precision arithmetic)
//! - Bits 8-10: Interrupt mask (I0, I1, I2)
//! - Bit 12: Master/interrupt state (M, 68020+)
//! - Bit 13: Supervisor mode (S)
//! - Bit 14: Trace on change of flow (T0, 68020+)
//! - Bit 15: Trace mode (T1)

use crate::alu::{Size, sign_extend};

/// Carry flag.
pub const C: u16 = 0x0001;
/// Overflow flag.
pub const V: u16 = 0x0002;
/// Zero flag.
pub const Z: u16 = 0x0004;
/// Negative flag.
pub const N: u16 = 0x0008;
/// Extend flag.
pub const X: u16 = 0x0010;

/// Interrupt mask bits.
pub const INTERRUPT_MASK: u16 = 0x0700;

/// Master/interrupt state flag (68020+).
pub const M: u16 = 0x1000;
/// Supervisor mode flag.
pub const S: u16 = 0x2000;
/// Trace on change of flow (68020+).
pub const T0: u16 = 0x4000;
/// Trace mode flag.
pub const T: u16 = 0x8000;

/// Mask for condition codes only (bits 0-4).
pub const CCR_MASK: u16 = 0x001F;
/// Valid SR bits on the 68000 and 68010.
pub const SR_MASK_68000: u16 = 0xA71F;
/// Valid SR bits on the 68020 and later.
pub const SR_MASK_68020: u16 = 0xF71F;

/// Status register helper functions.
pub struct Status;

impl Status {
    /// Update N and Z from a value of the given size, leaving V, C and X.
    #[must_use]
    pub fn update_nz(sr: u16, value: u32, size: Size) -> u16 {
        let signed = sign_extend(value, size) as i32;
        let mut result = sr & !(N | Z);
        if signed == 0 {
            result |= Z;
        }
        if signed < 0 {
            result |= N;
        }
        result
    }

    /// Clear V and C flags (used by MOVE, AND, OR, EOR, etc).
    #[must_use]
    pub fn clear_vc(sr: u16) -> u16 {
        sr & !(V | C)
    }

    /// The flag policy of data movement and logic: N and Z from the value,
    /// V and C cleared, X preserved.
    #[must_use]
    pub fn logical(sr: u16, value: u32, size: Size) -> u16 {
        Self::clear_vc(Self::update_nz(sr, value, size))
    }

    /// Set a flag if condition is true, clear if false.
    #[must_use]
    pub fn set_if(sr: u16, flag: u16, condition: bool) -> u16 {
        if condition { sr | flag } else { sr & !flag }
    }

    /// Evaluate a condition code (0-15).
    #[must_use]
    pub fn condition(sr: u16, cc: u8) -> bool {
        let c = sr & C != 0;
        let v = sr & V != 0;
        let z = sr & Z != 0;
        let n = sr & N != 0;
        match cc & 0x0F {
            0x0 => true,            // T
            0x1 => false,           // F
            0x2 => !c && !z,        // HI
            0x3 => c || z,          // LS
            0x4 => !c,              // CC/HS
            0x5 => c,               // CS/LO
            0x6 => !z,              // NE
            0x7 => z,               // EQ
            0x8 => !v,              // VC
            0x9 => v,               // VS
            0xA => !n,              // PL
            0xB => n,               // MI
            0xC => n == v,          // GE
            0xD => n != v,          // LT
            0xE => !z && (n == v),  // GT
            _ => z || (n != v),     // LE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_keeps_extend() {
        let sr = Status::logical(X | V | C, 0x80, Size::Byte);
        assert_eq!(sr, X | N);
    }

    #[test]
    fn update_nz_uses_operand_size() {
        assert_eq!(Status::update_nz(0, 0x0001_0000, Size::Word), Z);
        assert_eq!(Status::update_nz(0, 0x0001_0000, Size::Long), 0);
        assert_eq!(Status::update_nz(0, 0x8000, Size::Word), N);
    }

    #[test]
    fn signed_conditions() {
        // GE: N == V
        assert!(Status::condition(N | V, 0xC));
        assert!(!Status::condition(N, 0xC));
        // LE: Z or N != V
        assert!(Status::condition(Z, 0xF));
        assert!(Status::condition(V, 0xF));
        assert!(!Status::condition(0, 0xF));
        // HI: !C && !Z
        assert!(Status::condition(0, 0x2));
        assert!(!Status::condition(C, 0x2));
    }
}
