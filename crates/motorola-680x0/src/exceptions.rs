//! Exception kinds and exception processing.
//!
//! Frame layouts by model:
//! - 68000: PC and SR. Bus and address errors push the 14-byte group-0
//!   frame (info word, access address, IR, SR, PC).
//! - 68010: format 0 (SR, PC, format/vector word).
//! - 68020+: format 2 (format 0 plus the instruction address) for CHK,
//!   TRAPV, TRAPcc, zero divide and trace; format 0 otherwise.
//!
//! A fault while stacking the frame or fetching the vector halts the CPU.

use tracing::{debug, warn};

use crate::alu::Size;
use crate::flags::{S, T, T0};
use crate::memory::FunctionCode;
use crate::model::CpuModel;
use crate::state::{Condition, ProcessorState};

/// An emulated processor exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    BusError,
    AddressError,
    IllegalInstruction,
    ZeroDivide,
    Chk,
    /// TRAPV and TRAPcc.
    TrapV,
    PrivilegeViolation,
    Trace,
    LineA,
    LineF,
    FormatError,
    /// TRAP #n (n = 0-15).
    Trap(u8),
}

impl Exception {
    /// Vector number.
    #[must_use]
    pub fn vector(self) -> u8 {
        match self {
            Self::BusError => 2,
            Self::AddressError => 3,
            Self::IllegalInstruction => 4,
            Self::ZeroDivide => 5,
            Self::Chk => 6,
            Self::TrapV => 7,
            Self::PrivilegeViolation => 8,
            Self::Trace => 9,
            Self::LineA => 10,
            Self::LineF => 11,
            Self::FormatError => 14,
            Self::Trap(n) => 32 + (n & 0x0F),
        }
    }

    /// Faults stack the address of the failing instruction; traps stack
    /// the address of the next one.
    #[must_use]
    pub fn is_fault(self) -> bool {
        matches!(
            self,
            Self::BusError
                | Self::AddressError
                | Self::IllegalInstruction
                | Self::PrivilegeViolation
                | Self::LineA
                | Self::LineF
                | Self::FormatError
        )
    }

    /// Bus and address errors.
    #[must_use]
    pub fn is_group_zero(self) -> bool {
        matches!(self, Self::BusError | Self::AddressError)
    }

    /// Stack frame format for `model`.
    #[must_use]
    pub fn frame_format(self, model: CpuModel) -> u16 {
        if model >= CpuModel::M68020
            && matches!(self, Self::Chk | Self::TrapV | Self::ZeroDivide | Self::Trace)
        {
            2
        } else {
            0
        }
    }
}

impl ProcessorState<'_> {
    /// Process `exception`: switch to supervisor, stack a frame and jump
    /// through the vector table.
    pub fn raise(&mut self, exception: Exception) {
        debug!(?exception, pc = self.instruction_pc, "exception");
        if self.stack_frame(exception).is_err() {
            self.double_fault(exception);
            return;
        }
        let vector_addr = self
            .regs
            .vbr
            .wrapping_add(u32::from(exception.vector()) * 4);
        match self.mem.get_long(vector_addr, FunctionCode::SupervisorData) {
            Some(handler) if handler & 1 == 0 => {
                self.regs.pc = handler;
                if self.condition == Condition::Stopped {
                    self.condition = Condition::Normal;
                }
            }
            _ => self.double_fault(exception),
        }
    }

    fn double_fault(&mut self, exception: Exception) {
        warn!(?exception, "double fault, halting");
        self.condition = Condition::Halted;
    }

    fn stack_frame(&mut self, exception: Exception) -> Result<(), Exception> {
        let old_sr = self.regs.sr;
        let pc = if exception.is_fault() {
            self.instruction_pc
        } else {
            self.regs.pc
        };
        self.regs.sr = (old_sr | S) & !(T | T0);

        if self.model.capabilities().format_frames {
            let format = exception.frame_format(self.model);
            if format == 2 {
                self.push_long(self.instruction_pc)?;
            }
            self.push_word((format << 12) | (u16::from(exception.vector()) * 4))?;
            self.push_long(pc)?;
            self.push_word(old_sr)?;
            return Ok(());
        }

        self.push_long(pc)?;
        self.push_word(old_sr)?;
        if exception.is_group_zero() {
            let fault = self.fault;
            let info = u16::from(fault.fc.bits())
                | if fault.instruction { 0 } else { 0x08 }
                | if fault.write { 0 } else { 0x10 };
            self.push_word(self.opcode)?;
            self.push_long(fault.address)?;
            self.push_word(info)?;
        }
        Ok(())
    }

    /// Return from exception: unstack SR and PC (and on 68010+ check the
    /// frame format).
    pub fn return_from_exception(&mut self) -> Result<(), Exception> {
        let sp = self.regs.ssp;
        let sr = self.read(sp, Size::Word, FunctionCode::SupervisorData)? as u16;
        let pc = self.read(sp.wrapping_add(2), Size::Long, FunctionCode::SupervisorData)?;
        let frame_size = if self.model.capabilities().format_frames {
            let format = self.read(sp.wrapping_add(6), Size::Word, FunctionCode::SupervisorData)? >> 12;
            match format {
                0 => 8,
                2 => 12,
                _ => return Err(Exception::FormatError),
            }
        } else {
            6
        };
        self.regs.ssp = sp.wrapping_add(frame_size);
        self.set_sr(sr);
        self.regs.pc = pc;
        Ok(())
    }

    /// Load SSP and PC from vectors 0 and 1 and enter supervisor mode with
    /// interrupts masked.
    pub fn reset(&mut self) {
        self.regs.sr = 0x2700;
        self.regs.vbr = 0;
        self.condition = Condition::Normal;
        let ssp = self.mem.get_long(0, FunctionCode::SupervisorProgram);
        let pc = self.mem.get_long(4, FunctionCode::SupervisorProgram);
        match (ssp, pc) {
            (Some(ssp), Some(pc)) => {
                self.regs.ssp = ssp;
                self.regs.pc = pc;
            }
            _ => {
                warn!("reset vectors unreadable, halting");
                self.condition = Condition::Halted;
            }
        }
    }
}
