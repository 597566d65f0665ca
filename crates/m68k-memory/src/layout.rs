/// Shape of the default address space.
///
/// RAM starts at 0. Its first `supervisor_limit` bytes (the exception
/// vectors) are supervisor-only; the rest is user RAM. The heap window must
/// lie above RAM and below the callback region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryLayout {
    pub ram_size: u32,
    pub supervisor_limit: u32,
    pub heap_base: u32,
    pub heap_size: u32,
}

impl MemoryLayout {
    /// End of the 256-entry exception vector table.
    pub const VECTOR_TABLE_END: u32 = 0x400;
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self {
            ram_size: 0x0010_0000,
            supervisor_limit: Self::VECTOR_TABLE_END,
            heap_base: 0x4000_0000,
            heap_size: 0x0100_0000,
        }
    }
}
