//! Instruction dispatch.
//!
//! One [`Emulator::step`] runs one instruction to completion: fetch and
//! decode the opcode, check the model and privilege, fetch operands, load
//! the destination, run the microcode and store the result. Any fault on
//! the way becomes an emulated exception; nothing after the fault runs.

use tracing::{trace, warn};

use crate::bridge::{CallbackTable, call_number};
use crate::decode;
use crate::exceptions::Exception;
use crate::instruction::{InstructionFlags, OpParams};
use crate::load_store::{load, store};
use crate::memory::Memory;
use crate::model::CpuModel;
use crate::registers::Registers;
use crate::state::{Condition, ProcessorState};

/// A processor bound to its memory and its host callbacks.
pub struct Emulator<'m> {
    state: ProcessorState<'m>,
    callbacks: CallbackTable,
}

impl<'m> Emulator<'m> {
    /// An emulator with no host callbacks installed.
    pub fn new(model: CpuModel, mem: &'m mut dyn Memory) -> Self {
        Self::with_callbacks(model, mem, CallbackTable::new())
    }

    pub fn with_callbacks(model: CpuModel, mem: &'m mut dyn Memory, callbacks: CallbackTable) -> Self {
        Self {
            state: ProcessorState::new(model, mem),
            callbacks,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ProcessorState<'m> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ProcessorState<'m> {
        &mut self.state
    }

    #[must_use]
    pub fn regs(&self) -> &Registers {
        &self.state.regs
    }

    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.state.regs
    }

    #[must_use]
    pub fn model(&self) -> CpuModel {
        self.state.model
    }

    #[must_use]
    pub fn condition(&self) -> Condition {
        self.state.condition
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackTable {
        &mut self.callbacks
    }

    /// Processor reset: SSP and PC from vectors 0 and 1.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Leave the stopped state entered by STOP.
    pub fn resume(&mut self) {
        if self.state.condition == Condition::Stopped {
            self.state.condition = Condition::Normal;
        }
    }

    /// Step until the processor stops or halts, or `limit` steps have run.
    /// Returns the number of steps taken.
    pub fn run(&mut self, limit: usize) -> usize {
        let mut steps = 0;
        while steps < limit {
            steps += 1;
            if !self.step() {
                break;
            }
        }
        steps
    }

    /// Execute one instruction (or one host callback). Returns false when
    /// the processor is not in a condition to continue.
    pub fn step(&mut self) -> bool {
        if self.state.condition != Condition::Normal {
            return false;
        }

        let pc = self.state.regs.pc;
        let traced = self.state.regs.is_trace();
        self.state.instruction_pc = pc;

        let opcode = if let Some(n) = call_number(pc) {
            match self.callbacks.invoke(n, &mut self.state) {
                Some(opcode) => opcode,
                None => {
                    warn!(call = n, "callback did not resume, halting");
                    self.state.condition = Condition::Halted;
                    return false;
                }
            }
        } else {
            match self.state.fetch_word() {
                Ok(opcode) => opcode,
                Err(exception) => {
                    self.state.raise(exception);
                    return self.state.condition == Condition::Normal;
                }
            }
        };

        match execute(&mut self.state, opcode) {
            Ok(()) if traced && self.state.condition != Condition::Halted => {
                self.state.raise(Exception::Trace);
            }
            Ok(()) => {}
            Err(exception) => self.state.raise(exception),
        }

        self.state.condition == Condition::Normal
    }
}

fn undecodable(opcode: u16) -> Exception {
    match opcode >> 12 {
        0xA => Exception::LineA,
        0xF => Exception::LineF,
        _ => Exception::IllegalInstruction,
    }
}

fn execute(state: &mut ProcessorState<'_>, opcode: u16) -> Result<(), Exception> {
    state.opcode = opcode;
    trace!(pc = state.instruction_pc, opcode, "execute");

    let instruction = decode::lookup(opcode).ok_or_else(|| undecodable(opcode))?;

    if instruction.flags.min_model() > state.model {
        return Err(Exception::IllegalInstruction);
    }
    if instruction.flags.privileged_on(state.model) && !state.regs.is_supervisor() {
        return Err(Exception::PrivilegeViolation);
    }

    let mut params = OpParams::new(instruction.size);
    for (i, fetch) in instruction.fetch.iter().enumerate() {
        let value = fetch(state, &mut params)?;
        if i == 0 {
            params.first = value;
        } else {
            params.second = value;
        }
    }

    if instruction.flags.contains(InstructionFlags::LOADS_AND) {
        load(state, &mut params)?;
    }

    (instruction.code)(state, &mut params)?;

    store(state, &params, instruction.flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{RTS, callback_address};
    use crate::memory::FlatMemory;

    fn memory_with(program: &[u16]) -> FlatMemory {
        let mut mem = FlatMemory::new(0x10000, 0);
        mem.load_words(0x1000, program);
        mem
    }

    #[test]
    fn moveq_then_add() {
        let mut mem = memory_with(&[0x7005, 0x7203, 0xD081]); // MOVEQ #5,D0; MOVEQ #3,D1; ADD.L D1,D0
        let mut emu = Emulator::new(CpuModel::M68000, &mut mem);
        emu.regs_mut().pc = 0x1000;
        assert_eq!(emu.run(3), 3);
        assert_eq!(emu.regs().d[0], 8);
        assert_eq!(emu.regs().pc, 0x1006);
    }

    #[test]
    fn stop_waits_for_resume() {
        let mut mem = memory_with(&[0x4E72, 0x2000, 0x4E71]); // STOP #$2000; NOP
        let mut emu = Emulator::new(CpuModel::M68000, &mut mem);
        emu.regs_mut().pc = 0x1000;
        assert!(!emu.step());
        assert_eq!(emu.condition(), Condition::Stopped);
        assert_eq!(emu.regs().sr, 0x2000);
        assert!(!emu.step());
        emu.resume();
        assert!(emu.step());
        assert_eq!(emu.regs().pc, 0x1006);
    }

    #[test]
    fn callback_result_runs_in_place() {
        let mut mem = FlatMemory::new(0x10000, 0);
        let mut emu = Emulator::new(CpuModel::M68000, &mut mem);
        emu.callbacks_mut().install(2, |s: &mut ProcessorState<'_>| {
            s.regs.d[0] = 0x1234;
            Some(RTS)
        });
        emu.regs_mut().ssp = 0x8000;
        emu.state_mut().push_long(0x2000).unwrap();
        emu.regs_mut().pc = callback_address(2).unwrap();
        assert!(emu.step());
        assert_eq!(emu.regs().d[0], 0x1234);
        assert_eq!(emu.regs().pc, 0x2000);
        assert_eq!(emu.regs().ssp, 0x8000);
    }

    #[test]
    fn missing_callback_halts() {
        let mut mem = FlatMemory::new(0x100, 0);
        let mut emu = Emulator::new(CpuModel::M68000, &mut mem);
        emu.regs_mut().pc = callback_address(9).unwrap();
        assert!(!emu.step());
        assert_eq!(emu.condition(), Condition::Halted);
    }
}
