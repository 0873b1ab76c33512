//! Store adapters implementing [`PaginatedStore`](crate::domain::ports::PaginatedStore).

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
