//! Port implementations: in-memory for tests and single-session use, and an
//! optional RocksDB backend for durability across runs.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
