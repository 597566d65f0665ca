//! Address-space interface: function codes, access kinds and translation.
//!
//! Every memory access the interpreter makes goes through
//! [`Memory::translate`], which validates a whole byte range against the
//! requesting function code and access kind and hands back a slice. A range
//! that is not entirely accessible is rejected as a unit, so a failed write
//! never lands partially.

/// Function code values from the 68000's FC0-FC2 pins.
///
/// These combine privilege (user/supervisor) with the address space
/// (program/data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionCode {
    /// User data access (FC=1).
    UserData = 1,
    /// User program access (FC=2).
    UserProgram = 2,
    /// Supervisor data access (FC=5).
    SupervisorData = 5,
    /// Supervisor program access (FC=6).
    SupervisorProgram = 6,
}

impl FunctionCode {
    /// Build a function code from supervisor flag and program/data flag.
    #[must_use]
    pub fn from_flags(supervisor: bool, program: bool) -> Self {
        match (supervisor, program) {
            (false, false) => Self::UserData,
            (false, true) => Self::UserProgram,
            (true, false) => Self::SupervisorData,
            (true, true) => Self::SupervisorProgram,
        }
    }

    /// Function code from an SFC/DFC register value. Codes without an
    /// address space here (0, 3, 4, 7) return `None`.
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 7 {
            1 => Some(Self::UserData),
            2 => Some(Self::UserProgram),
            5 => Some(Self::SupervisorData),
            6 => Some(Self::SupervisorProgram),
            _ => None,
        }
    }

    /// Returns the 3-bit value for the function code.
    #[must_use]
    pub fn bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn is_supervisor(self) -> bool {
        matches!(self, Self::SupervisorData | Self::SupervisorProgram)
    }

    #[must_use]
    pub fn is_program(self) -> bool {
        matches!(self, Self::UserProgram | Self::SupervisorProgram)
    }
}

/// What the caller intends to do with a translated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Read only. The returned slice must not be written.
    Read,
    /// Write.
    Write,
    /// Revalidate a range as writable and mark it modified. Used after bytes
    /// were changed through an earlier translation.
    Update,
}

impl Access {
    /// True for accesses that require a writable range.
    #[must_use]
    pub fn writes(self) -> bool {
        !matches!(self, Self::Read)
    }
}

/// Page-granular allocator reachable through [`Memory::allocator`].
///
/// Addresses handed out are user read/write, program and data.
pub trait PageAllocator {
    /// Allocation granule in bytes.
    fn page_size(&self) -> u32;

    /// Allocate `size` bytes (rounded up to whole pages, at least one),
    /// zero-filled. Returns `None` when the heap is exhausted.
    fn allocate(&mut self, size: u32) -> Option<u32>;

    /// Map an already-filled buffer whose length is a multiple of the page
    /// size.
    fn allocate_n_pages(&mut self, bytes: Vec<u8>) -> Option<u32>;

    /// Free the block starting at `addr`. Unknown addresses return false.
    fn deallocate(&mut self, addr: u32) -> bool;
}

/// An emulated address space.
pub trait Memory {
    /// Validate `len` bytes at `addr` for `access` under `fc` and return
    /// them, or `None` if any byte is inaccessible.
    fn translate(&mut self, addr: u32, len: u32, fc: FunctionCode, access: Access)
    -> Option<&mut [u8]>;

    /// Page allocator backing this address space, if any.
    fn allocator(&mut self) -> Option<&mut dyn PageAllocator> {
        None
    }

    fn get_byte(&mut self, addr: u32, fc: FunctionCode) -> Option<u8> {
        self.translate(addr, 1, fc, Access::Read).map(|b| b[0])
    }

    fn get_word(&mut self, addr: u32, fc: FunctionCode) -> Option<u16> {
        let b = self.translate(addr, 2, fc, Access::Read)?;
        Some(u16::from_be_bytes([b[0], b[1]]))
    }

    fn get_long(&mut self, addr: u32, fc: FunctionCode) -> Option<u32> {
        let b = self.translate(addr, 4, fc, Access::Read)?;
        Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn put_byte(&mut self, addr: u32, value: u8, fc: FunctionCode) -> Option<()> {
        self.translate(addr, 1, fc, Access::Write)?[0] = value;
        Some(())
    }

    fn put_word(&mut self, addr: u32, value: u16, fc: FunctionCode) -> Option<()> {
        self.translate(addr, 2, fc, Access::Write)?
            .copy_from_slice(&value.to_be_bytes());
        Some(())
    }

    fn put_long(&mut self, addr: u32, value: u32, fc: FunctionCode) -> Option<()> {
        self.translate(addr, 4, fc, Access::Write)?
            .copy_from_slice(&value.to_be_bytes());
        Some(())
    }
}

/// Contiguous RAM from address 0 with a supervisor-only prefix.
///
/// Program and data spaces alias the same bytes. Mostly useful for tests
/// and small embedders that do not need an allocator.
#[derive(Debug, Clone)]
pub struct FlatMemory {
    bytes: Vec<u8>,
    supervisor_limit: u32,
}

impl FlatMemory {
    /// `size` bytes of zeroed RAM; addresses below `supervisor_limit` are
    /// only accessible from supervisor mode.
    #[must_use]
    pub fn new(size: usize, supervisor_limit: u32) -> Self {
        Self {
            bytes: vec![0; size],
            supervisor_limit,
        }
    }

    /// Copy `data` to `addr` bypassing protection.
    ///
    /// # Panics
    ///
    /// Panics if the range runs past the end of memory.
    pub fn load(&mut self, addr: u32, data: &[u8]) {
        let start = addr as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    /// Write big-endian words at `addr` bypassing protection.
    ///
    /// # Panics
    ///
    /// Panics if the range runs past the end of memory.
    pub fn load_words(&mut self, addr: u32, words: &[u16]) {
        for (i, word) in words.iter().enumerate() {
            let at = addr as usize + i * 2;
            self.bytes[at..at + 2].copy_from_slice(&word.to_be_bytes());
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Big-endian long at `addr`, bypassing protection.
    ///
    /// # Panics
    ///
    /// Panics if `addr + 4` is past the end of memory.
    #[must_use]
    pub fn peek_long(&self, addr: u32) -> u32 {
        let a = addr as usize;
        u32::from_be_bytes([
            self.bytes[a],
            self.bytes[a + 1],
            self.bytes[a + 2],
            self.bytes[a + 3],
        ])
    }

    /// Big-endian word at `addr`, bypassing protection.
    ///
    /// # Panics
    ///
    /// Panics if `addr + 2` is past the end of memory.
    #[must_use]
    pub fn peek_word(&self, addr: u32) -> u16 {
        let a = addr as usize;
        u16::from_be_bytes([self.bytes[a], self.bytes[a + 1]])
    }
}

impl Memory for FlatMemory {
    fn translate(
        &mut self,
        addr: u32,
        len: u32,
        fc: FunctionCode,
        _access: Access,
    ) -> Option<&mut [u8]> {
        let end = addr.checked_add(len)?;
        if end as usize > self.bytes.len() {
            return None;
        }
        if !fc.is_supervisor() && addr < self.supervisor_limit {
            return None;
        }
        self.bytes.get_mut(addr as usize..end as usize)
    }
}
