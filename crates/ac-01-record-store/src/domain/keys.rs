//! # Key Ranges
//!
//! Helpers for turning a key prefix into the half-open scan range used by
//! "list all X" queries.

/// Sentinel byte appended to a prefix to form the exclusive range end.
///
/// Keys are ASCII, so no stored key under the prefix can sort at or after it.
pub const RANGE_END_SENTINEL: u8 = 0xFF;

/// Exclusive end key for a scan over everything starting with `prefix`.
pub fn range_end(prefix: &[u8]) -> Vec<u8> {
    let mut end = Vec::with_capacity(prefix.len() + 1);
    end.extend_from_slice(prefix);
    end.push(RANGE_END_SENTINEL);
    end
}

/// `(start, end)` pair covering every ASCII key beginning with `prefix`.
pub fn prefix_range(prefix: &[u8]) -> (Vec<u8>, Vec<u8>) {
    (prefix.to_vec(), range_end(prefix))
}
