//! Persistence: the cached string table and the daily snapshot store.

pub mod cache;
pub mod snapshot;

pub use cache::CacheFile;
pub use snapshot::{
    from_row, to_row, DailySnapshot, JsonlSnapshotStore, MemorySnapshotStore, SnapshotStore,
    StoredSnapshot, BUCKETS,
};
