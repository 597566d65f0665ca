//! Default host services for emulated programs.
//!
//! [`default_table`] fills a [`CallbackTable`] with the sixteen standard
//! host calls in [`HostCall`] order. Arguments and results travel in
//! registers; recoverable failures are reported in registers too (errno in
//! D1, Mac OS result codes in D0 or low-memory globals). The exception
//! handlers at calls 2-9 are terminal: they print a diagnostic and raise
//! the matching host signal.

mod config;
mod error;
mod fatal;
mod files;
mod services;
mod vectors;

use motorola_680x0::{CallbackTable, callback_address};

pub use config::HostConfig;
pub use error::HostError;
pub use vectors::install_default_vectors;

/// Call numbers of the default table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HostCall {
    Unimplemented = 0,
    Load = 1,
    IllegalInstruction = 2,
    DivisionByZero = 3,
    ChkRange = 4,
    TrapvOverflow = 5,
    PrivilegeViolation = 6,
    TraceException = 7,
    LineAEmulator = 8,
    LineFEmulator = 9,
    UnimplementedTrap = 10,
    NewPtr = 11,
    DisposePtr = 12,
    BlockMove = 13,
    Gestalt = 14,
    NoOp = 15,
}

impl HostCall {
    pub const ALL: [Self; 16] = [
        Self::Unimplemented,
        Self::Load,
        Self::IllegalInstruction,
        Self::DivisionByZero,
        Self::ChkRange,
        Self::TrapvOverflow,
        Self::PrivilegeViolation,
        Self::TraceException,
        Self::LineAEmulator,
        Self::LineFEmulator,
        Self::UnimplementedTrap,
        Self::NewPtr,
        Self::DisposePtr,
        Self::BlockMove,
        Self::Gestalt,
        Self::NoOp,
    ];

    #[must_use]
    pub const fn number(self) -> u16 {
        self as u16
    }

    /// PC that invokes this call.
    #[must_use]
    pub fn address(self) -> u32 {
        // Sixteen calls always fit the callback region.
        callback_address(self.number()).unwrap_or_default()
    }
}

/// A table with every default host call installed.
#[must_use]
pub fn default_table(config: HostConfig) -> CallbackTable {
    let mut table = CallbackTable::new();
    table.install(HostCall::Unimplemented.number(), services::unimplemented);
    table.install(HostCall::Load.number(), move |s| files::load(s, &config));
    table.install(HostCall::IllegalInstruction.number(), fatal::illegal_instruction);
    table.install(HostCall::DivisionByZero.number(), fatal::division_by_zero);
    table.install(HostCall::ChkRange.number(), fatal::chk_range);
    table.install(HostCall::TrapvOverflow.number(), fatal::trapv_overflow);
    table.install(HostCall::PrivilegeViolation.number(), fatal::privilege_violation);
    table.install(HostCall::TraceException.number(), fatal::trace_exception);
    table.install(HostCall::LineAEmulator.number(), fatal::line_a_emulator);
    table.install(HostCall::LineFEmulator.number(), fatal::line_f_emulator);
    table.install(HostCall::UnimplementedTrap.number(), fatal::unimplemented_trap);
    table.install(HostCall::NewPtr.number(), services::new_ptr);
    table.install(HostCall::DisposePtr.number(), services::dispose_ptr);
    table.install(HostCall::BlockMove.number(), services::block_move);
    table.install(HostCall::Gestalt.number(), services::gestalt);
    table.install(HostCall::NoOp.number(), services::no_op);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use motorola_680x0::call_number;

    #[test]
    fn call_addresses_match_the_bridge() {
        for call in HostCall::ALL {
            assert_eq!(call_number(call.address()), Some(call.number()));
        }
        assert_eq!(HostCall::Unimplemented.address(), 0xFFFF_FFFE);
        assert_eq!(HostCall::NoOp.address(), 0xFFFF_FFE0);
    }

    #[test]
    fn default_table_is_full() {
        let table = default_table(HostConfig::default());
        assert_eq!(table.len(), HostCall::ALL.len());
        assert!(HostCall::ALL.iter().all(|c| table.contains(c.number())));
        assert!(!table.contains(16));
    }
}
