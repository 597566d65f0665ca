//! Shift and rotate instructions.
//!
//! `first` carries the count (already reduced to 0-63 or 1-8 by the
//! fetcher), `second` the operand. Bit 8 of the opcode selects left.

use crate::alu::Size;
use crate::exceptions::Exception;
use crate::flags::{C, N, V, X, Z};
use crate::instruction::OpParams;
use crate::state::ProcessorState;

type Outcome = Result<(), Exception>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    Arithmetic,
    Logical,
    RotateExtend,
    Rotate,
}

/// Shift `value` by `count` one bit at a time. Returns (result, sr).
#[must_use]
pub fn shift(kind: ShiftKind, left: bool, count: u32, value: u32, size: Size, sr: u16) -> (u32, u16) {
    let mask = size.mask();
    let msb = size.msb_mask();
    let mut value = value & mask;
    let mut x = sr & X != 0;
    let mut carry = false;
    let mut overflow = false;

    for _ in 0..count {
        if left {
            let out = value & msb != 0;
            let fill = match kind {
                ShiftKind::Arithmetic | ShiftKind::Logical => 0,
                ShiftKind::RotateExtend => u32::from(x),
                ShiftKind::Rotate => u32::from(out),
            };
            value = ((value << 1) | fill) & mask;
            if kind == ShiftKind::Arithmetic && (value & msb != 0) != out {
                overflow = true;
            }
            carry = out;
        } else {
            let out = value & 1 != 0;
            let fill = match kind {
                ShiftKind::Arithmetic => value & msb,
                ShiftKind::Logical => 0,
                ShiftKind::RotateExtend => {
                    if x {
                        msb
                    } else {
                        0
                    }
                }
                ShiftKind::Rotate => {
                    if out {
                        msb
                    } else {
                        0
                    }
                }
            };
            value = (value >> 1) | fill;
            carry = out;
        }
        if kind != ShiftKind::Rotate {
            x = carry;
        }
    }

    let mut flags = sr & !(N | Z | V | C);
    if count == 0 {
        // Rotating through X with no count copies X into C.
        if kind == ShiftKind::RotateExtend && sr & X != 0 {
            flags |= C;
        }
    } else {
        if carry {
            flags |= C;
        }
        if kind != ShiftKind::Rotate {
            flags = if x { flags | X } else { flags & !X };
        }
    }
    if overflow {
        flags |= V;
    }
    if value == 0 {
        flags |= Z;
    }
    if value & msb != 0 {
        flags |= N;
    }
    (value, flags)
}

fn run(kind: ShiftKind, state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    let left = state.opcode & 0x0100 != 0;
    let (result, sr) = shift(kind, left, params.first, params.second, params.size, state.regs.sr);
    params.result = result;
    state.regs.sr = sr;
    Ok(())
}

pub fn asd(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    run(ShiftKind::Arithmetic, state, params)
}

pub fn lsd(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    run(ShiftKind::Logical, state, params)
}

pub fn roxd(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    run(ShiftKind::RotateExtend, state, params)
}

pub fn rod(state: &mut ProcessorState<'_>, params: &mut OpParams) -> Outcome {
    run(ShiftKind::Rotate, state, params)
}
