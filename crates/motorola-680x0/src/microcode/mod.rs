//! Per-opcode semantic functions.
//!
//! Microcode sees operands already resolved by the fetchers (`first`,
//! `second`, and the target) and leaves its value in `result` for the
//! generic store. Instructions whose results don't fit that shape (MOVEM,
//! multiply/divide, EXG) write registers and memory directly.

pub mod arith;
pub mod branches;
pub mod logic;
pub mod misc;
pub mod moves;
pub mod shifts;

/// Register number in bits 11-9.
pub(crate) fn reg_0e00(opcode: u16) -> usize {
    usize::from((opcode >> 9) & 7)
}

/// Register number in bits 2-0.
pub(crate) fn reg_0007(opcode: u16) -> usize {
    usize::from(opcode & 7)
}
