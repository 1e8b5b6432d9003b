//! Staged writes committed as one batch.

use std::collections::BTreeMap;

use ac_01_record_store::{BatchOperation, KeyValueStore};

use super::codec::RecordCodec;
use crate::domain::entities::Record;
use crate::domain::errors::AcademyError;
use crate::domain::keys::EntityKey;

/// Writes collected by an operation after all its checks pass.
///
/// Nothing touches the store until [`UnitOfWork::commit`], which issues a
/// single `atomic_batch_write`. Staging the same key twice keeps the last
/// write.
#[derive(Debug)]
pub struct UnitOfWork {
    codec: RecordCodec,
    staged: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl UnitOfWork {
    pub fn new(codec: RecordCodec) -> Self {
        Self {
            codec,
            staged: BTreeMap::new(),
        }
    }

    /// Stage a record under its own key.
    pub fn put<T: Record>(&mut self, record: &T) -> Result<(), AcademyError> {
        let value = self.codec.encode(record)?;
        self.staged.insert(record.key().as_bytes().to_vec(), Some(value));
        Ok(())
    }

    pub fn delete(&mut self, key: &EntityKey) {
        self.staged.insert(key.as_bytes().to_vec(), None);
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Apply every staged write atomically. Returns the number of keys
    /// written. An empty unit of work does not touch the store.
    pub fn commit(self, store: &mut dyn KeyValueStore) -> Result<usize, AcademyError> {
        if self.staged.is_empty() {
            return Ok(0);
        }
        let count = self.staged.len();
        let operations = self
            .staged
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::Put { key, value },
                None => BatchOperation::Delete { key },
            })
            .collect();
        store.atomic_batch_write(operations)?;
        Ok(count)
    }
}
