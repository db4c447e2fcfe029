//! Key-value storage layers.
//!
//! Two implementations of one interface: [`MemoryStore`] (moka-backed,
//! byte-weighted LRU) as the fast layer and [`DiskStore`] (one file per
//! key) as the durable layer. The stats cache stacks them cache-aside;
//! nothing above this module knows which layer a value came from.

mod disk;
mod memory;
mod traits;

pub use disk::{clear_disk_store, disk_store_stats, ClearResult, DiskStore};
pub use memory::{MemoryStore, DEFAULT_MEMORY_SIZE_BYTES};
pub use traits::{BoxFuture, KeyValueStore, StoreError};
