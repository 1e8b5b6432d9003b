//! # Academy Node
//!
//! One-shot host around the academy records service.
//!
//! ## Invocation Sequence
//!
//! 1. Load configuration (defaults, then `ACADEMY_*` environment variables)
//! 2. Validate it
//! 3. Lock the data directory and open `records.db`
//! 4. Resolve the caller from the credential document
//! 5. Invoke the operation and print its payload

pub mod config;
pub mod runner;

pub use config::{ConfigError, NodeConfig};
pub use runner::run_once;
