//! Page heap backing NewPtr and file loading.
//!
//! Blocks are whole pages placed first-fit inside a fixed window of the
//! address space. Every block is user read/write, program and data.

use std::collections::BTreeMap;

use motorola_680x0::{Access, FunctionCode, PageAllocator};
use tracing::debug;

pub const PAGE_SIZE_BITS: u32 = 12;
pub const PAGE_SIZE: u32 = 1 << PAGE_SIZE_BITS;

#[derive(Debug, Clone)]
pub struct Heap {
    base: u32,
    size: u32,
    blocks: BTreeMap<u32, Vec<u8>>,
}

/// Round `len` up to whole pages, at least one.
fn page_round(len: u64) -> u64 {
    let page = u64::from(PAGE_SIZE);
    len.max(1).div_ceil(page) * page
}

impl Heap {
    /// A heap window of `size` bytes at `base`. Both are truncated to page
    /// boundaries.
    #[must_use]
    pub fn new(base: u32, size: u32) -> Self {
        let mask = !(PAGE_SIZE - 1);
        Self {
            base: base & mask,
            size: size & mask,
            blocks: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn base(&self) -> u32 {
        self.base
    }

    /// One past the last byte of the window.
    #[must_use]
    pub fn end(&self) -> u64 {
        u64::from(self.base) + u64::from(self.size)
    }

    /// Whether `addr` lies inside the heap window (allocated or not).
    #[must_use]
    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.base && u64::from(addr) < self.end()
    }

    /// Bytes currently allocated.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.blocks.values().map(|b| b.len() as u64).sum()
    }

    /// Size of the block starting at `addr`.
    #[must_use]
    pub fn block_len(&self, addr: u32) -> Option<u32> {
        self.blocks.get(&addr).map(|b| b.len() as u32)
    }

    fn find_gap(&self, len: u64) -> Option<u32> {
        let mut cursor = u64::from(self.base);
        for (&start, block) in &self.blocks {
            if u64::from(start) - cursor >= len {
                break;
            }
            cursor = u64::from(start) + block.len() as u64;
        }
        if self.end() - cursor >= len {
            u32::try_from(cursor).ok()
        } else {
            None
        }
    }

    fn insert(&mut self, bytes: Vec<u8>) -> Option<u32> {
        let addr = self.find_gap(bytes.len() as u64)?;
        debug!(addr, len = bytes.len(), "heap block allocated");
        self.blocks.insert(addr, bytes);
        Some(addr)
    }

    /// Bytes `addr..addr + len` if they lie inside one block. Heap pages
    /// accept every function code and access kind.
    pub fn translate(
        &mut self,
        addr: u32,
        len: u32,
        _fc: FunctionCode,
        _access: Access,
    ) -> Option<&mut [u8]> {
        let (&start, block) = self.blocks.range_mut(..=addr).next_back()?;
        let offset = (addr - start) as usize;
        let end = offset.checked_add(len as usize)?;
        block.get_mut(offset..end)
    }
}

impl PageAllocator for Heap {
    fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    fn allocate(&mut self, size: u32) -> Option<u32> {
        let len = usize::try_from(page_round(u64::from(size))).ok()?;
        if len as u64 > u64::from(self.size) {
            return None;
        }
        self.insert(vec![0; len])
    }

    fn allocate_n_pages(&mut self, bytes: Vec<u8>) -> Option<u32> {
        if bytes.is_empty() || bytes.len() % PAGE_SIZE as usize != 0 {
            return None;
        }
        self.insert(bytes)
    }

    fn deallocate(&mut self, addr: u32) -> bool {
        let freed = self.blocks.remove(&addr).is_some();
        if freed {
            debug!(addr, "heap block freed");
        }
        freed
    }
}
