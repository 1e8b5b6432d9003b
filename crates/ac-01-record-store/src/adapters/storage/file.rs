use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{apply_batch, scan_range, OrderedMap};
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};

/// File-backed ordered key-value store.
///
/// Holds the full map in memory and rewrites a single snapshot file on every
/// mutation. File format: `[key_len:u32][key][value_len:u32][value]...`,
/// little-endian lengths.
pub struct FileBackedKVStore {
    data: OrderedMap,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading any existing snapshot.
    ///
    /// A missing file yields an empty store. A truncated or malformed file is
    /// reported as `CorruptionError` rather than silently dropped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = match std::fs::File::open(&path) {
            Ok(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes).map_err(KVStoreError::io)?;
                let data = decode_snapshot(&bytes)?;
                info!(
                    "[ac-01] Loaded {} keys ({} bytes) from {}",
                    data.len(),
                    bytes.len(),
                    path.display()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[ac-01] No existing record file at {}", path.display());
                OrderedMap::new()
            }
            Err(e) => return Err(KVStoreError::io(e)),
        };

        Ok(Self { data, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(path: &Path, data: &OrderedMap) -> Result<(), KVStoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(KVStoreError::io)?;
            }
        }

        let bytes = encode_snapshot(data)?;

        // Write via temp file so a crash never leaves a half-written snapshot.
        let temp_path = path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(KVStoreError::io)?;
        file.write_all(&bytes).map_err(KVStoreError::io)?;
        file.sync_all().map_err(KVStoreError::io)?;
        std::fs::rename(&temp_path, path).map_err(KVStoreError::io)?;

        debug!("[ac-01] Wrote {} keys to {}", data.len(), path.display());
        Ok(())
    }

    /// Apply `mutate` to a copy, persist it, then swap it in.
    fn commit(&mut self, mutate: impl FnOnce(&mut OrderedMap)) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        mutate(&mut next);
        Self::save(&self.path, &next)?;
        self.data = next;
        Ok(())
    }
}

fn encode_snapshot(data: &OrderedMap) -> Result<Vec<u8>, KVStoreError> {
    let mut bytes = Vec::new();
    for (key, value) in data {
        for chunk in [key, value] {
            let len = u32::try_from(chunk.len()).map_err(|_| KVStoreError::IOError {
                message: format!("entry of {} bytes exceeds u32 length prefix", chunk.len()),
            })?;
            bytes.extend_from_slice(&len.to_le_bytes());
            bytes.extend_from_slice(chunk);
        }
    }
    Ok(bytes)
}

fn decode_snapshot(bytes: &[u8]) -> Result<OrderedMap, KVStoreError> {
    let mut data = OrderedMap::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let key = read_chunk(bytes, &mut cursor)?;
        let value = read_chunk(bytes, &mut cursor)?;
        data.insert(key, value);
    }

    Ok(data)
}

fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, KVStoreError> {
    let header = bytes
        .get(*cursor..*cursor + 4)
        .ok_or_else(|| truncated(*cursor))?;
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(header);
    let len = u32::from_le_bytes(len_bytes) as usize;
    *cursor += 4;

    let chunk = bytes
        .get(*cursor..*cursor + len)
        .ok_or_else(|| truncated(*cursor))?;
    *cursor += len;
    Ok(chunk.to_vec())
}

fn truncated(offset: usize) -> KVStoreError {
    KVStoreError::CorruptionError {
        message: format!("record file truncated at byte {}", offset),
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|data| {
            data.insert(key.to_vec(), value.to_vec());
        })
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.commit(|data| {
            data.remove(key);
        })
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.commit(|data| apply_batch(data, operations))
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(scan_range(&self.data, start, end))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }
}
