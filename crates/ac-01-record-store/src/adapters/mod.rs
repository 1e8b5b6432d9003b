//! # Adapters Layer
//!
//! - `storage`: `KeyValueStore` implementations (in-memory, file-backed)
//! - `lock`: Data directory process lock (singleton writer guard)

#[cfg(feature = "locking")]
pub mod lock;
pub mod storage;

#[cfg(feature = "locking")]
pub use lock::{DatabaseLock, LockError};
pub use storage::{FileBackedKVStore, InMemoryKVStore};
