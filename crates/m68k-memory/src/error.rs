use thiserror::Error;

/// Failure to build or populate the address space.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("region at {base:#010X} is empty")]
    Empty { base: u32 },

    #[error("region at {base:#010X} of {len:#X} bytes runs past the end of the address space")]
    Wraps { base: u32, len: usize },

    #[error("region {base:#010X}..{end:#010X} overlaps the region at {other:#010X}")]
    Overlap { base: u32, end: u64, other: u32 },

    #[error("region {base:#010X}..{end:#010X} overlaps the heap window")]
    HeapWindow { base: u32, end: u64 },

    #[error("region {base:#010X}..{end:#010X} overlaps the callback region")]
    CallbackRegion { base: u32, end: u64 },

    #[error("{len:#X} bytes at {addr:#010X} are not inside one mapped region")]
    Unmapped { addr: u32, len: usize },

    #[error("supervisor limit {limit:#X} exceeds RAM size {ram_size:#X}")]
    SupervisorLimit { limit: u32, ram_size: u32 },
}
