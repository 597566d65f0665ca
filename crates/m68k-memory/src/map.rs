//! Region map implementing the interpreter's `Memory` trait.

use std::ops::Range;

use motorola_680x0::bridge::CALLBACK_REGION_START;
use motorola_680x0::{Access, FunctionCode, Memory, PageAllocator};
use tracing::{debug, trace};

use crate::error::MapError;
use crate::heap::Heap;
use crate::layout::MemoryLayout;
use crate::protection::Protection;

#[derive(Debug, Clone)]
struct Region {
    base: u32,
    bytes: Vec<u8>,
    protection: Protection,
}

impl Region {
    fn end(&self) -> u64 {
        u64::from(self.base) + self.bytes.len() as u64
    }
}

/// Mapped regions, a heap window and the update log.
///
/// A translated range must lie wholly inside one region (or one heap
/// block) whose protection admits the access; anything else is rejected
/// before a byte is touched.
#[derive(Debug, Clone)]
pub struct MemoryMap {
    /// Sorted by base, non-overlapping.
    regions: Vec<Region>,
    heap: Heap,
    updates: Vec<Range<u32>>,
}

impl MemoryMap {
    /// A map with no regions and the given heap window.
    #[must_use]
    pub fn with_heap(heap: Heap) -> Self {
        Self {
            regions: Vec::new(),
            heap,
            updates: Vec::new(),
        }
    }

    /// Supervisor-only vectors, user RAM above them and the heap window.
    pub fn new(layout: &MemoryLayout) -> Result<Self, MapError> {
        if layout.supervisor_limit > layout.ram_size {
            return Err(MapError::SupervisorLimit {
                limit: layout.supervisor_limit,
                ram_size: layout.ram_size,
            });
        }
        let mut map = Self::with_heap(Heap::new(layout.heap_base, layout.heap_size));
        if layout.supervisor_limit > 0 {
            map.map(
                0,
                vec![0; layout.supervisor_limit as usize],
                Protection::SUPERVISOR_RAM,
            )?;
        }
        let user = layout.ram_size - layout.supervisor_limit;
        if user > 0 {
            map.map(
                layout.supervisor_limit,
                vec![0; user as usize],
                Protection::RAM,
            )?;
        }
        Ok(map)
    }

    /// Map `bytes` at `base`.
    pub fn map(&mut self, base: u32, bytes: Vec<u8>, protection: Protection) -> Result<(), MapError> {
        if bytes.is_empty() {
            return Err(MapError::Empty { base });
        }
        let end = u64::from(base) + bytes.len() as u64;
        if end > 1 << 32 {
            return Err(MapError::Wraps {
                base,
                len: bytes.len(),
            });
        }
        if end > u64::from(CALLBACK_REGION_START) {
            return Err(MapError::CallbackRegion { base, end });
        }
        if u64::from(base) < self.heap.end() && end > u64::from(self.heap.base()) {
            return Err(MapError::HeapWindow { base, end });
        }
        if let Some(other) = self
            .regions
            .iter()
            .find(|r| u64::from(base) < r.end() && end > u64::from(r.base))
        {
            return Err(MapError::Overlap {
                base,
                end,
                other: other.base,
            });
        }

        debug!(base, end, ?protection, "region mapped");
        let index = self.regions.partition_point(|r| r.base < base);
        self.regions.insert(
            index,
            Region {
                base,
                bytes,
                protection,
            },
        );
        Ok(())
    }

    /// Remove the region starting at `base`, returning its contents.
    pub fn unmap(&mut self, base: u32) -> Option<Vec<u8>> {
        let index = self.regions.iter().position(|r| r.base == base)?;
        Some(self.regions.remove(index).bytes)
    }

    fn region_index(&self, addr: u32, len: u32) -> Option<usize> {
        let index = self.regions.partition_point(|r| r.base <= addr).checked_sub(1)?;
        let end = u64::from(addr) + u64::from(len);
        (end <= self.regions[index].end()).then_some(index)
    }

    /// Copy `data` to `addr`, ignoring protection. For loaders and tests.
    pub fn load(&mut self, addr: u32, data: &[u8]) -> Result<(), MapError> {
        let unmapped = MapError::Unmapped {
            addr,
            len: data.len(),
        };
        let len = u32::try_from(data.len()).map_err(|_| unmapped.clone())?;
        if self.heap.contains(addr) {
            let bytes = self
                .heap
                .translate(addr, len, FunctionCode::SupervisorData, Access::Write)
                .ok_or(unmapped)?;
            bytes.copy_from_slice(data);
            return Ok(());
        }
        let index = self.region_index(addr, len).ok_or(unmapped)?;
        let region = &mut self.regions[index];
        let offset = (addr - region.base) as usize;
        region.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Load big-endian words at `addr`, ignoring protection.
    pub fn load_words(&mut self, addr: u32, words: &[u16]) -> Result<(), MapError> {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        self.load(addr, &bytes)
    }

    #[must_use]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Drain the ranges revalidated with [`Access::Update`] since the last
    /// call.
    pub fn take_updates(&mut self) -> Vec<Range<u32>> {
        std::mem::take(&mut self.updates)
    }
}

impl Memory for MemoryMap {
    fn translate(
        &mut self,
        addr: u32,
        len: u32,
        fc: FunctionCode,
        access: Access,
    ) -> Option<&mut [u8]> {
        let end = addr.checked_add(len)?;

        if self.heap.contains(addr) {
            let bytes = self.heap.translate(addr, len, fc, access);
            if bytes.is_some() && access == Access::Update {
                self.updates.push(addr..end);
            }
            return bytes;
        }

        let Some(index) = self.region_index(addr, len) else {
            trace!(addr, len, ?fc, "unmapped access");
            return None;
        };
        let region = &mut self.regions[index];
        if !region.protection.allows(fc, access) {
            trace!(addr, len, ?fc, ?access, "protection violation");
            return None;
        }
        if access == Access::Update {
            self.updates.push(addr..end);
        }
        let offset = (addr - region.base) as usize;
        region.bytes.get_mut(offset..offset + len as usize)
    }

    fn allocator(&mut self) -> Option<&mut dyn PageAllocator> {
        Some(&mut self.heap)
    }
}
