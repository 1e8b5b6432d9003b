//! # Record Store Adapter (ac-01)
//!
//! Thin typed wrapper over the ledger's ordered key-value store. Everything
//! above this crate sees exactly four primitives: get-by-key, put, delete and
//! an ordered range scan, plus an all-or-nothing batch used to commit a unit
//! of work.
//!
//! ## Key Space
//!
//! Keys are flat ASCII strings of the form `<Kind>-<id>`. A "list all X"
//! query is a scan of the half-open range `["<Kind>-", "<Kind>-\xFF")`, see
//! [`domain::keys::prefix_range`].
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Store errors and key-range helpers
//! - `ports/` - The `KeyValueStore` driven port and `BatchOperation`
//! - `adapters/` - In-memory and file-backed stores, data directory lock
//!
//! ## Usage
//!
//! ```ignore
//! use ac_01_record_store::{BatchOperation, InMemoryKVStore, KeyValueStore};
//!
//! let mut store = InMemoryKVStore::new();
//! store.atomic_batch_write(vec![
//!     BatchOperation::put("Course-C1", b"{}".to_vec()),
//!     BatchOperation::delete("Course-C0"),
//! ])?;
//! let courses = store.prefix_scan(b"Course-")?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::storage::{FileBackedKVStore, InMemoryKVStore};
#[cfg(feature = "locking")]
pub use adapters::lock::{DatabaseLock, LockError};
pub use domain::errors::KVStoreError;
pub use domain::keys::{prefix_range, range_end};
pub use ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
