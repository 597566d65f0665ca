//! Instruction descriptors: what the dispatch loop needs to run one opcode.

use std::fmt;
use std::ops::BitOr;

use crate::alu::Size;
use crate::exceptions::Exception;
use crate::model::CpuModel;
use crate::state::ProcessorState;

/// Per-instruction behaviour flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstructionFlags(pub u16);

impl InstructionFlags {
    pub const NONE: Self = Self(0);
    /// Privileged on 68010 and later (MOVE from SR).
    pub const PRIVILEGED_EXCEPT_ON_68000: Self = Self(0x01);
    pub const PRIVILEGED: Self = Self(0x02);
    pub const NOT_BEFORE_68010: Self = Self(0x10);
    pub const NOT_BEFORE_68020: Self = Self(0x20);
    pub const NOT_BEFORE_68030: Self = Self(0x30);
    pub const NOT_BEFORE_68040: Self = Self(0x40);
    /// Load the destination into `second` before microcode runs.
    pub const LOADS_AND: Self = Self(0x80);
    /// Write `result` to the target after microcode runs.
    pub const STORES_DATA: Self = Self(0x100);
    /// Microcode computes the CCR itself.
    pub const AND_SETS_CCR: Self = Self(0x800);

    const MODEL_MASK: u16 = 0x70;

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Earliest model that implements the instruction.
    #[must_use]
    pub const fn min_model(self) -> CpuModel {
        match self.0 & Self::MODEL_MASK {
            0x00 => CpuModel::M68000,
            0x10 => CpuModel::M68010,
            0x20 => CpuModel::M68020,
            0x30 => CpuModel::M68030,
            _ => CpuModel::M68040,
        }
    }

    /// Whether executing the instruction in user mode on `model` is a
    /// privilege violation.
    #[must_use]
    pub fn privileged_on(self, model: CpuModel) -> bool {
        self.contains(Self::PRIVILEGED)
            || (self.contains(Self::PRIVILEGED_EXCEPT_ON_68000) && model > CpuModel::M68000)
    }
}

impl BitOr for InstructionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Where an instruction's result goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    None,
    Data(u8),
    Address(u8),
    /// At [`OpParams::address`].
    Memory,
}

/// Operands of the instruction being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpParams {
    pub size: Size,
    pub target: Target,
    /// Effective address, valid when `target` is [`Target::Memory`].
    pub address: u32,
    /// Source operand.
    pub first: u32,
    /// Destination operand (or second fetched value).
    pub second: u32,
    pub result: u32,
}

impl OpParams {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            target: Target::None,
            address: 0,
            first: 0,
            second: 0,
            result: 0,
        }
    }
}

/// Resolves one operand. The return values of an instruction's fetchers fill
/// `first` and then `second`.
pub type Fetcher = fn(&mut ProcessorState<'_>, &mut OpParams) -> Result<u32, Exception>;

/// Semantic function of an opcode.
pub type Microcode = fn(&mut ProcessorState<'_>, &mut OpParams) -> Result<(), Exception>;

/// One entry of the instruction table.
#[derive(Clone, Copy)]
pub struct Instruction {
    pub fetch: &'static [Fetcher],
    pub code: Microcode,
    pub size: Size,
    pub flags: InstructionFlags,
}

impl Instruction {
    #[must_use]
    pub const fn new(
        fetch: &'static [Fetcher],
        code: Microcode,
        size: Size,
        flags: InstructionFlags,
    ) -> Self {
        Self {
            fetch,
            code,
            size,
            flags,
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("fetchers", &self.fetch.len())
            .field("size", &self.size)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
