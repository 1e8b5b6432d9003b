//! Storage Adapters
//!
//! Implementations of the `KeyValueStore` trait.

mod file;
mod memory;

pub use file::FileBackedKVStore;
pub use memory::InMemoryKVStore;

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::ports::outbound::{BatchOperation, ScanResult};

type OrderedMap = BTreeMap<Vec<u8>, Vec<u8>>;

fn apply_batch(data: &mut OrderedMap, operations: Vec<BatchOperation>) {
    for op in operations {
        match op {
            BatchOperation::Put { key, value } => {
                data.insert(key, value);
            }
            BatchOperation::Delete { key } => {
                data.remove(&key);
            }
        }
    }
}

fn scan_range(data: &OrderedMap, start: &[u8], end: &[u8]) -> ScanResult {
    // BTreeMap::range panics on an inverted range.
    if start >= end {
        return Vec::new();
    }
    data.range::<[u8], _>((Bound::Included(start), Bound::Excluded(end)))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
