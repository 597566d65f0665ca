//! Addressing mode definitions for the 680x0 family.
//!
//! The instruction table uses these to decide which mode/register
//! combinations an opcode accepts. The fetcher resolves them at run time.

/// Addressing mode of a 6-bit effective-address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// Data register direct: Dn
    DataReg(u8),
    /// Address register direct: An
    AddrReg(u8),
    /// Address register indirect: (An)
    AddrInd(u8),
    /// Address register indirect with postincrement: (An)+
    AddrIndPostInc(u8),
    /// Address register indirect with predecrement: -(An)
    AddrIndPreDec(u8),
    /// Address register indirect with displacement: d16(An)
    AddrIndDisp(u8),
    /// Address register indirect with index: d8(An,Xn)
    AddrIndIndex(u8),
    /// Absolute short: (xxx).W
    AbsShort,
    /// Absolute long: (xxx).L
    AbsLong,
    /// Program counter with displacement: d16(PC)
    PcDisp,
    /// Program counter with index: d8(PC,Xn)
    PcIndex,
    /// Immediate: #<data>
    Immediate,
}

impl AddrMode {
    /// Decode addressing mode from mode/register fields.
    #[must_use]
    pub fn decode(mode: u8, reg: u8) -> Option<Self> {
        match mode & 0x07 {
            0 => Some(Self::DataReg(reg & 0x07)),
            1 => Some(Self::AddrReg(reg & 0x07)),
            2 => Some(Self::AddrInd(reg & 0x07)),
            3 => Some(Self::AddrIndPostInc(reg & 0x07)),
            4 => Some(Self::AddrIndPreDec(reg & 0x07)),
            5 => Some(Self::AddrIndDisp(reg & 0x07)),
            6 => Some(Self::AddrIndIndex(reg & 0x07)),
            _ => match reg & 0x07 {
                0 => Some(Self::AbsShort),
                1 => Some(Self::AbsLong),
                2 => Some(Self::PcDisp),
                3 => Some(Self::PcIndex),
                4 => Some(Self::Immediate),
                _ => None,
            },
        }
    }

    /// Decode the standard effective-address field in the low six bits
    /// (mode in bits 5-3, register in bits 2-0).
    #[must_use]
    pub fn from_ea(field: u16) -> Option<Self> {
        Self::decode(((field >> 3) & 7) as u8, (field & 7) as u8)
    }

    /// Decode the MOVE destination field (register in bits 11-9, mode in
    /// bits 8-6).
    #[must_use]
    pub fn from_move_destination(opcode: u16) -> Option<Self> {
        Self::decode(((opcode >> 6) & 7) as u8, ((opcode >> 9) & 7) as u8)
    }

    /// Any mode except address register direct.
    #[must_use]
    pub fn is_data(&self) -> bool {
        !matches!(self, Self::AddrReg(_))
    }

    /// Any mode that names memory.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        !matches!(self, Self::DataReg(_) | Self::AddrReg(_))
    }

    /// Modes with an address but no side effect (LEA, PEA, JMP, MOVEM).
    #[must_use]
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Self::AddrInd(_)
                | Self::AddrIndDisp(_)
                | Self::AddrIndIndex(_)
                | Self::AbsShort
                | Self::AbsLong
                | Self::PcDisp
                | Self::PcIndex
        )
    }

    /// Any writable mode.
    #[must_use]
    pub fn is_alterable(&self) -> bool {
        !matches!(self, Self::PcDisp | Self::PcIndex | Self::Immediate)
    }

    /// Check if this mode is a data alterable destination.
    #[must_use]
    pub fn is_data_alterable(&self) -> bool {
        self.is_data() && self.is_alterable()
    }

    /// Check if this mode is memory alterable.
    #[must_use]
    pub fn is_memory_alterable(&self) -> bool {
        self.is_memory() && self.is_alterable()
    }

    /// Control modes that can be written to (MOVEM to memory).
    #[must_use]
    pub fn is_control_alterable(&self) -> bool {
        self.is_control() && self.is_alterable()
    }
}
