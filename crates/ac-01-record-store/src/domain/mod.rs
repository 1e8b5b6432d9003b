//! # Domain Layer
//!
//! Store-level error types and key-range arithmetic. No I/O lives here.

pub mod errors;
pub mod keys;
