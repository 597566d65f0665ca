//! CPU model/capability definitions for the Motorola 68k family.
//!
//! The model gates which instruction variants decode, which control
//! registers exist, how exception frames look, and whether misaligned data
//! accesses fault.

use crate::flags::{SR_MASK_68000, SR_MASK_68020};

/// Selected Motorola 68k CPU model.
///
/// Models are ordered, so `model >= CpuModel::M68020` reads as "at least a
/// 68020".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CpuModel {
    /// Motorola MC68000.
    #[default]
    M68000,
    /// Motorola MC68010.
    M68010,
    /// Motorola MC68020.
    M68020,
    /// Motorola MC68030.
    M68030,
    /// Motorola MC68040.
    M68040,
}

/// Capability flags for a specific CPU model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuCapabilities {
    /// `CACR`, `CAAR`, `MSP` and `ISP` are reachable through `MOVEC`.
    pub cacr: bool,
    /// Exception frames carry a format/vector-offset word.
    pub format_frames: bool,
    /// Word and long data accesses may use odd addresses.
    pub misaligned_data: bool,
}

impl CpuModel {
    /// Static capability set for this CPU model.
    #[must_use]
    pub const fn capabilities(self) -> CpuCapabilities {
        match self {
            Self::M68000 => CpuCapabilities {
                cacr: false,
                format_frames: false,
                misaligned_data: false,
            },
            Self::M68010 => CpuCapabilities {
                cacr: false,
                format_frames: true,
                misaligned_data: false,
            },
            Self::M68020 | Self::M68030 | Self::M68040 => CpuCapabilities {
                cacr: true,
                format_frames: true,
                misaligned_data: true,
            },
        }
    }

    /// Bits of the status register that exist on this model.
    #[must_use]
    pub const fn sr_mask(self) -> u16 {
        match self {
            Self::M68000 | Self::M68010 => SR_MASK_68000,
            _ => SR_MASK_68020,
        }
    }

    /// Processor type as reported by the Gestalt `'proc'` selector
    /// (68000 is 1, 68010 is 2, and so on).
    #[must_use]
    pub const fn gestalt_processor_type(self) -> u32 {
        match self {
            Self::M68000 => 1,
            Self::M68010 => 2,
            Self::M68020 => 3,
            Self::M68030 => 4,
            Self::M68040 => 5,
        }
    }
}
