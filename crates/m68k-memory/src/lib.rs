//! Address space for the 680x0 interpreter: protected regions, a page heap
//! and a log of out-of-band updates.

mod error;
mod heap;
mod layout;
mod map;
mod protection;

pub use error::MapError;
pub use heap::{Heap, PAGE_SIZE, PAGE_SIZE_BITS};
pub use layout::MemoryLayout;
pub use map::MemoryMap;
pub use protection::Protection;
