//! 680x0 CPU registers.
//!
//! - D0-D7: 8 data registers (32-bit)
//! - A0-A7: 8 address registers (32-bit, A7 is the active stack pointer)
//! - USP: User stack pointer (A7 when in user mode)
//! - SSP: Supervisor stack pointer (A7 when in supervisor mode)
//! - PC: Program counter (32-bit)
//! - SR: Status register (16-bit)
//! - VBR, SFC, DFC (68010+), CACR, CAAR, MSP (68020+): control registers

use crate::flags::{CCR_MASK, S, T};

/// 680x0 CPU register set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    /// Data registers D0-D7.
    pub d: [u32; 8],
    /// Address registers A0-A6 (A7 is handled via USP/SSP).
    pub a: [u32; 7],
    /// User stack pointer (active A7 when in user mode).
    pub usp: u32,
    /// Supervisor stack pointer (active A7 when in supervisor mode).
    pub ssp: u32,
    /// Program counter.
    pub pc: u32,
    /// Status register.
    pub sr: u16,
    /// Vector base register.
    pub vbr: u32,
    /// Source function code (MOVES).
    pub sfc: u8,
    /// Destination function code (MOVES).
    pub dfc: u8,
    /// Cache control register.
    pub cacr: u32,
    /// Cache address register.
    pub caar: u32,
    /// Master stack pointer. Held for MOVEC only; master mode is not modelled.
    pub msp: u32,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Create registers in reset state.
    ///
    /// After reset: supervisor mode, interrupt mask level 7.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            d: [0; 8],
            a: [0; 7],
            usp: 0,
            ssp: 0,
            pc: 0,
            sr: 0x2700,
            vbr: 0,
            sfc: 0,
            dfc: 0,
            cacr: 0,
            caar: 0,
            msp: 0,
        }
    }

    /// Get address register by index (0-7).
    /// A7 returns the active stack pointer based on supervisor mode.
    #[must_use]
    pub fn a(&self, n: usize) -> u32 {
        debug_assert!(n < 8);
        if n < 7 { self.a[n] } else { self.active_sp() }
    }

    /// Set address register by index (0-7).
    /// A7 sets the active stack pointer based on supervisor mode.
    pub fn set_a(&mut self, n: usize, value: u32) {
        debug_assert!(n < 8);
        if n < 7 {
            self.a[n] = value;
        } else {
            self.set_active_sp(value);
        }
    }

    /// Get a register by its 4-bit general index: 0-7 are D0-D7, 8-15 are
    /// A0-A7 (the encoding used by MOVEM masks, index words and MOVEC).
    #[must_use]
    pub fn general(&self, index: usize) -> u32 {
        if index < 8 { self.d[index] } else { self.a(index & 7) }
    }

    /// Set a register by its 4-bit general index.
    pub fn set_general(&mut self, index: usize, value: u32) {
        if index < 8 {
            self.d[index] = value;
        } else {
            self.set_a(index & 7, value);
        }
    }

    /// Get the active stack pointer (USP or SSP based on supervisor mode).
    #[must_use]
    pub const fn active_sp(&self) -> u32 {
        if self.is_supervisor() {
            self.ssp
        } else {
            self.usp
        }
    }

    /// Set the active stack pointer.
    pub fn set_active_sp(&mut self, value: u32) {
        if self.is_supervisor() {
            self.ssp = value;
        } else {
            self.usp = value;
        }
    }

    /// Check if in supervisor mode.
    #[must_use]
    pub const fn is_supervisor(&self) -> bool {
        self.sr & S != 0
    }

    /// Get the interrupt mask level (0-7).
    #[must_use]
    pub const fn interrupt_mask(&self) -> u8 {
        ((self.sr >> 8) & 0x07) as u8
    }

    /// Check if trace mode is enabled.
    #[must_use]
    pub const fn is_trace(&self) -> bool {
        self.sr & T != 0
    }

    /// Get the condition code register (low byte of SR).
    #[must_use]
    pub const fn ccr(&self) -> u8 {
        (self.sr & CCR_MASK) as u8
    }

    /// Set the condition code register (low five bits of SR).
    pub fn set_ccr(&mut self, value: u8) {
        self.sr = (self.sr & !CCR_MASK) | (u16::from(value) & CCR_MASK);
    }
}

#[cfg(test)]
mod tests {
    use super::Registers;

    #[test]
    fn a7_follows_supervisor_bit() {
        let mut regs = Registers::new();
        regs.ssp = 0x1000;
        regs.usp = 0x2000;
        assert_eq!(regs.a(7), 0x1000);
        regs.sr &= !0x2000;
        assert_eq!(regs.a(7), 0x2000);
        regs.set_a(7, 0x2FFC);
        assert_eq!(regs.usp, 0x2FFC);
        assert_eq!(regs.ssp, 0x1000);
    }

    #[test]
    fn general_index_covers_both_files() {
        let mut regs = Registers::new();
        regs.set_general(3, 0x33);
        regs.set_general(10, 0xA2);
        assert_eq!(regs.d[3], 0x33);
        assert_eq!(regs.a(2), 0xA2);
        assert_eq!(regs.general(10), 0xA2);
    }

    #[test]
    fn set_ccr_ignores_reserved_bits() {
        let mut regs = Registers::new();
        regs.set_ccr(0xFF);
        assert_eq!(regs.sr, 0x271F);
    }
}
