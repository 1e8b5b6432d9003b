//! # Store Errors

use std::fmt;

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    IOError { message: String },
    /// Persisted data could not be decoded.
    CorruptionError { message: String },
}

impl KVStoreError {
    pub(crate) fn io(err: impl fmt::Display) -> Self {
        KVStoreError::IOError {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for KVStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVStoreError::IOError { message } => write!(f, "KV store I/O error: {}", message),
            KVStoreError::CorruptionError { message } => {
                write!(f, "KV store corruption: {}", message)
            }
        }
    }
}

impl std::error::Error for KVStoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KVStoreError::CorruptionError {
            message: "truncated record".to_string(),
        };
        assert_eq!(err.to_string(), "KV store corruption: truncated record");

        let err = KVStoreError::io("disk failure");
        assert!(err.to_string().contains("disk failure"));
    }
}
