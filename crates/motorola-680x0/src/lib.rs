//! Instruction-level Motorola 680x0 interpreter.
//!
//! The processor borrows its memory through the [`Memory`] trait, so every
//! access goes through `translate` and is checked against the function
//! code. Jumps into the top of the address space call host functions from a
//! per-emulator [`CallbackTable`].

pub mod addressing;
pub mod alu;
pub mod bridge;
pub mod decode;
pub mod emulator;
pub mod exceptions;
pub mod fetcher;
pub mod flags;
pub mod instruction;
pub mod load_store;
pub mod memory;
pub mod microcode;
pub mod model;
pub mod registers;
pub mod state;

pub use alu::{Size, merge, sign_extend};
pub use bridge::{Callback, CallbackTable, RTS, call_number, callback_address};
pub use emulator::Emulator;
pub use exceptions::Exception;
pub use memory::{Access, FlatMemory, FunctionCode, Memory, PageAllocator};
pub use model::{CpuCapabilities, CpuModel};
pub use registers::Registers;
pub use state::{Condition, ProcessorState};
