use std::ops::BitOr;

use motorola_680x0::{Access, FunctionCode};

/// Access rules of a mapped region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Protection(pub u8);

impl Protection {
    pub const NONE: Self = Self(0);
    /// Only accessible with a supervisor function code.
    pub const SUPERVISOR_ONLY: Self = Self(0x01);
    pub const READ_ONLY: Self = Self(0x02);
    /// Instruction fetches allowed.
    pub const PROGRAM: Self = Self(0x04);
    /// Data accesses allowed.
    pub const DATA: Self = Self(0x08);

    /// Ordinary RAM: user read/write, program and data.
    pub const RAM: Self = Self(Self::PROGRAM.0 | Self::DATA.0);
    /// The exception vector table and other supervisor globals.
    pub const SUPERVISOR_RAM: Self = Self(Self::RAM.0 | Self::SUPERVISOR_ONLY.0);
    pub const ROM: Self = Self(Self::RAM.0 | Self::READ_ONLY.0);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether an access of kind `access` under `fc` is permitted.
    #[must_use]
    pub fn allows(self, fc: FunctionCode, access: Access) -> bool {
        if self.contains(Self::SUPERVISOR_ONLY) && !fc.is_supervisor() {
            return false;
        }
        if access.writes() && self.contains(Self::READ_ONLY) {
            return false;
        }
        if fc.is_program() {
            self.contains(Self::PROGRAM)
        } else {
            self.contains(Self::DATA)
        }
    }
}

impl BitOr for Protection {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_only_rejects_user_codes() {
        let p = Protection::SUPERVISOR_RAM;
        assert!(p.allows(FunctionCode::SupervisorData, Access::Write));
        assert!(p.allows(FunctionCode::SupervisorProgram, Access::Read));
        assert!(!p.allows(FunctionCode::UserData, Access::Read));
        assert!(!p.allows(FunctionCode::UserProgram, Access::Read));
    }

    #[test]
    fn read_only_rejects_writes_and_updates() {
        let p = Protection::ROM;
        assert!(p.allows(FunctionCode::UserData, Access::Read));
        assert!(!p.allows(FunctionCode::UserData, Access::Write));
        assert!(!p.allows(FunctionCode::SupervisorData, Access::Update));
    }

    #[test]
    fn space_must_match() {
        let data_only = Protection::DATA;
        assert!(data_only.allows(FunctionCode::UserData, Access::Read));
        assert!(!data_only.allows(FunctionCode::UserProgram, Access::Read));
    }
}
