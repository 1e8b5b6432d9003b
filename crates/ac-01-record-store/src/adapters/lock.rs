//! # Data Directory Lock
//!
//! Only one process may write a record directory at a time. The lock is an
//! advisory `fs2` lock (flock on Unix, LockFile on Windows) on a `LOCK` file
//! that also carries the holder's PID for error messages.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from acquiring the data directory lock.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("failed to create lock file: {0}")]
    CreateFailed(#[source] io::Error),

    #[error("record directory already in use{} ({})", pid_suffix(.pid), .path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    #[error("failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}

fn pid_suffix(pid: &Option<u32>) -> String {
    match pid {
        Some(p) => format!(" by process {}", p),
        None => String::new(),
    }
}

/// Exclusive lock on a record directory, released on drop.
///
/// ```ignore
/// let _lock = DatabaseLock::acquire(Path::new("/var/lib/academy"))?;
/// let store = FileBackedKVStore::open("/var/lib/academy/records.db")?;
/// ```
pub struct DatabaseLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DatabaseLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire the lock without blocking.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        std::fs::create_dir_all(data_dir).map_err(LockError::CreateFailed)?;
        let lock_path = data_dir.join(Self::LOCK_FILE);

        // Do not truncate before the lock is ours: the holder's PID lives there.
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(LockError::CreateFailed)?;

        if file.try_lock_exclusive().is_err() {
            let pid = Self::read_existing_pid(&lock_path);
            warn!(
                "[ac-01] Record directory {} is locked (holder pid {:?})",
                data_dir.display(),
                pid
            );
            return Err(LockError::AlreadyLocked {
                pid,
                path: lock_path,
            });
        }

        let pid = std::process::id();
        file.set_len(0).map_err(LockError::WriteFailed)?;
        writeln!(file, "{}", pid).map_err(LockError::WriteFailed)?;
        file.sync_all().map_err(LockError::WriteFailed)?;
        debug!("[ac-01] Acquired {}", lock_path.display());

        Ok(Self {
            file,
            path: lock_path,
            pid,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DatabaseLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}
