//! Processor state: registers, model, borrowed memory and fault bookkeeping.

use crate::alu::Size;
use crate::exceptions::Exception;
use crate::flags::CCR_MASK;
use crate::memory::{FunctionCode, Memory};
use crate::model::CpuModel;
use crate::registers::Registers;

/// Run condition of the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Executing instructions.
    #[default]
    Normal,
    /// Waiting after STOP until the embedder resumes it.
    Stopped,
    /// Double fault or a callback that declined to resume.
    Halted,
}

/// Details of the last bus or address error, used to build the group-0
/// exception frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub address: u32,
    pub fc: FunctionCode,
    pub write: bool,
    /// The access was an instruction fetch.
    pub instruction: bool,
}

impl Default for Fault {
    fn default() -> Self {
        Self {
            address: 0,
            fc: FunctionCode::SupervisorData,
            write: false,
            instruction: false,
        }
    }
}

/// Everything an instruction can touch.
pub struct ProcessorState<'m> {
    pub regs: Registers,
    pub model: CpuModel,
    pub mem: &'m mut dyn Memory,
    pub condition: Condition,
    /// Opcode word of the instruction being executed.
    pub opcode: u16,
    /// Address of the instruction being executed.
    pub instruction_pc: u32,
    pub fault: Fault,
}

impl<'m> ProcessorState<'m> {
    #[must_use]
    pub fn new(model: CpuModel, mem: &'m mut dyn Memory) -> Self {
        Self {
            regs: Registers::new(),
            model,
            mem,
            condition: Condition::Normal,
            opcode: 0,
            instruction_pc: 0,
            fault: Fault::default(),
        }
    }

    /// Data space for the current privilege level.
    #[must_use]
    pub fn data_space(&self) -> FunctionCode {
        FunctionCode::from_flags(self.regs.is_supervisor(), false)
    }

    /// Program space for the current privilege level.
    #[must_use]
    pub fn program_space(&self) -> FunctionCode {
        FunctionCode::from_flags(self.regs.is_supervisor(), true)
    }

    /// Write the status register, dropping bits the model doesn't have.
    ///
    /// Changing S swaps which of USP/SSP is visible as A7.
    pub fn set_sr(&mut self, value: u16) {
        self.regs.sr = value & self.model.sr_mask();
    }

    pub fn set_ccr(&mut self, value: u16) {
        self.regs.sr = (self.regs.sr & !CCR_MASK) | (value & CCR_MASK);
    }

    fn fail(&mut self, exception: Exception, address: u32, fc: FunctionCode, write: bool) -> Exception {
        self.fault = Fault {
            address,
            fc,
            write,
            instruction: fc.is_program(),
        };
        exception
    }

    /// Read a zero-extended value of `size` from `addr` in space `fc`.
    pub fn read(&mut self, addr: u32, size: Size, fc: FunctionCode) -> Result<u32, Exception> {
        if size != Size::Byte && addr & 1 != 0 && !self.model.capabilities().misaligned_data {
            return Err(self.fail(Exception::AddressError, addr, fc, false));
        }
        let value = match size {
            Size::Byte => self.mem.get_byte(addr, fc).map(u32::from),
            Size::Word => self.mem.get_word(addr, fc).map(u32::from),
            Size::Long => self.mem.get_long(addr, fc),
        };
        value.ok_or_else(|| self.fail(Exception::BusError, addr, fc, false))
    }

    /// Write the low `size` bytes of `value` to `addr` in space `fc`.
    pub fn write(&mut self, addr: u32, size: Size, value: u32, fc: FunctionCode) -> Result<(), Exception> {
        if size != Size::Byte && addr & 1 != 0 && !self.model.capabilities().misaligned_data {
            return Err(self.fail(Exception::AddressError, addr, fc, true));
        }
        let done = match size {
            Size::Byte => self.mem.put_byte(addr, value as u8, fc),
            Size::Word => self.mem.put_word(addr, value as u16, fc),
            Size::Long => self.mem.put_long(addr, value, fc),
        };
        done.ok_or_else(|| self.fail(Exception::BusError, addr, fc, true))
    }

    pub fn read_data(&mut self, addr: u32, size: Size) -> Result<u32, Exception> {
        let fc = self.data_space();
        self.read(addr, size, fc)
    }

    pub fn write_data(&mut self, addr: u32, size: Size, value: u32) -> Result<(), Exception> {
        let fc = self.data_space();
        self.write(addr, size, value, fc)
    }

    /// Fetch the word at PC from program space and advance PC.
    pub fn fetch_word(&mut self) -> Result<u16, Exception> {
        let pc = self.regs.pc;
        let fc = self.program_space();
        if pc & 1 != 0 {
            return Err(self.fail(Exception::AddressError, pc, fc, false));
        }
        let word = self
            .mem
            .get_word(pc, fc)
            .ok_or_else(|| self.fail(Exception::BusError, pc, fc, false))?;
        self.regs.pc = pc.wrapping_add(2);
        Ok(word)
    }

    /// Fetch the long at PC from program space and advance PC.
    pub fn fetch_long(&mut self) -> Result<u32, Exception> {
        let high = self.fetch_word()?;
        let low = self.fetch_word()?;
        Ok((u32::from(high) << 16) | u32::from(low))
    }

    pub fn push_word(&mut self, value: u16) -> Result<(), Exception> {
        let sp = self.regs.active_sp().wrapping_sub(2);
        self.write_data(sp, Size::Word, u32::from(value))?;
        self.regs.set_active_sp(sp);
        Ok(())
    }

    pub fn push_long(&mut self, value: u32) -> Result<(), Exception> {
        let sp = self.regs.active_sp().wrapping_sub(4);
        self.write_data(sp, Size::Long, value)?;
        self.regs.set_active_sp(sp);
        Ok(())
    }

    pub fn pop_word(&mut self) -> Result<u16, Exception> {
        let sp = self.regs.active_sp();
        let value = self.read_data(sp, Size::Word)?;
        self.regs.set_active_sp(sp.wrapping_add(2));
        Ok(value as u16)
    }

    pub fn pop_long(&mut self) -> Result<u32, Exception> {
        let sp = self.regs.active_sp();
        let value = self.read_data(sp, Size::Long)?;
        self.regs.set_active_sp(sp.wrapping_add(4));
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FlatMemory;

    #[test]
    fn odd_word_access_faults_before_68020() {
        let mut mem = FlatMemory::new(0x1000, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        assert_eq!(state.read_data(0x101, Size::Word), Err(Exception::AddressError));
        assert_eq!(state.fault.address, 0x101);
        assert!(state.read_data(0x101, Size::Byte).is_ok());

        let mut mem = FlatMemory::new(0x1000, 0);
        let mut state = ProcessorState::new(CpuModel::M68020, &mut mem);
        state.write_data(0x101, Size::Long, 0x1122_3344).unwrap();
        assert_eq!(state.read_data(0x101, Size::Long), Ok(0x1122_3344));
    }

    #[test]
    fn failed_access_is_a_bus_error() {
        let mut mem = FlatMemory::new(0x1000, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        assert_eq!(state.write_data(0x2000, Size::Long, 1), Err(Exception::BusError));
        assert!(state.fault.write);
    }

    #[test]
    fn push_and_pop_use_active_stack() {
        let mut mem = FlatMemory::new(0x1000, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.regs.ssp = 0x800;
        state.regs.usp = 0x400;
        state.push_long(0xDEAD_BEEF).unwrap();
        assert_eq!(state.regs.ssp, 0x7FC);
        assert_eq!(state.regs.usp, 0x400);
        assert_eq!(state.pop_long(), Ok(0xDEAD_BEEF));
        assert_eq!(state.regs.ssp, 0x800);
    }

    #[test]
    fn set_sr_masks_model_bits() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        state.set_sr(0xFFFF);
        assert_eq!(state.regs.sr, 0xA71F);
    }
}
