//! Host callback bridge.
//!
//! The top 64 KiB of the address space is never mapped. A jump to an even
//! address there is a request for a host call: the call number is
//! `pc / -2 - 1` with the PC read as a signed value, so 0xFFFF_FFFE is call
//! 0, 0xFFFF_FFFC call 1, and so on down to 0xFFFF_0000.
//!
//! A handler gets the live processor state and returns the opcode to run
//! next in place of a fetched one (normally RTS), or `None` to halt.

use tracing::{debug, warn};

use crate::state::ProcessorState;

/// Lowest address of the callback region.
pub const CALLBACK_REGION_START: u32 = 0xFFFF_0000;

/// Number of call slots in the region.
pub const CALLBACK_SLOTS: u32 = (0u32.wrapping_sub(CALLBACK_REGION_START)) / 2;

/// RTS, the usual resume opcode.
pub const RTS: u16 = 0x4E75;

/// Call number for a PC inside the callback region.
#[must_use]
pub fn call_number(pc: u32) -> Option<u16> {
    if pc < CALLBACK_REGION_START || pc & 1 != 0 {
        return None;
    }
    u16::try_from(pc.wrapping_neg() / 2 - 1).ok()
}

/// Address whose execution invokes call `n`.
#[must_use]
pub fn callback_address(n: u16) -> Option<u32> {
    let n = u32::from(n);
    if n >= CALLBACK_SLOTS {
        return None;
    }
    Some(0u32.wrapping_sub(2 * (n + 1)))
}

/// A host function reachable from emulated code.
pub type Callback = Box<dyn Fn(&mut ProcessorState<'_>) -> Option<u16>>;

/// Per-emulator table of host functions indexed by call number.
#[derive(Default)]
pub struct CallbackTable {
    slots: Vec<Option<Callback>>,
}

impl CallbackTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `callback` as call `n`, returning the handler it replaces.
    pub fn install<F>(&mut self, n: u16, callback: F) -> Option<Callback>
    where
        F: Fn(&mut ProcessorState<'_>) -> Option<u16> + 'static,
    {
        let index = usize::from(n);
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index].replace(Box::new(callback))
    }

    pub fn remove(&mut self, n: u16) -> Option<Callback> {
        self.slots.get_mut(usize::from(n)).and_then(Option::take)
    }

    #[must_use]
    pub fn contains(&self, n: u16) -> bool {
        matches!(self.slots.get(usize::from(n)), Some(Some(_)))
    }

    /// Number of installed handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run call `n`. An empty slot means "do not resume".
    pub fn invoke(&self, n: u16, state: &mut ProcessorState<'_>) -> Option<u16> {
        let Some(Some(callback)) = self.slots.get(usize::from(n)) else {
            warn!(call = n, "no handler installed");
            return None;
        };
        debug!(call = n, "host callback");
        callback(state)
    }
}

impl std::fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let installed: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
            .collect();
        f.debug_struct("CallbackTable")
            .field("installed", &installed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FlatMemory;
    use crate::model::CpuModel;

    #[test]
    fn call_numbers_count_down_from_the_top() {
        assert_eq!(call_number(0xFFFF_FFFE), Some(0));
        assert_eq!(call_number(0xFFFF_FFFC), Some(1));
        assert_eq!(call_number(0xFFFF_0000), Some(32767));
        assert_eq!(call_number(0xFFFF_FFFF), None);
        assert_eq!(call_number(0xFFFE_FFFE), None);
        assert_eq!(call_number(0x0000_1000), None);
    }

    #[test]
    fn callback_address_inverts_call_number() {
        for n in [0u16, 1, 15, 1000, 32767] {
            let pc = callback_address(n).unwrap();
            assert_eq!(call_number(pc), Some(n));
        }
        assert_eq!(callback_address(32768), None);
    }

    #[test]
    fn empty_slot_declines_to_resume() {
        let mut mem = FlatMemory::new(0x10, 0);
        let mut state = ProcessorState::new(CpuModel::M68000, &mut mem);
        let mut table = CallbackTable::new();
        assert_eq!(table.invoke(3, &mut state), None);

        table.install(3, |s: &mut ProcessorState<'_>| {
            s.regs.d[0] = 42;
            Some(RTS)
        });
        assert!(table.contains(3));
        assert_eq!(table.len(), 1);
        assert_eq!(table.invoke(3, &mut state), Some(RTS));
        assert_eq!(state.regs.d[0], 42);

        assert!(table.remove(3).is_some());
        assert!(table.is_empty());
        assert_eq!(table.invoke(3, &mut state), None);
    }
}
