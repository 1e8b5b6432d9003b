//! # Ports Layer
//!
//! - **Driven Ports (Outbound)**: `KeyValueStore`, implemented by the ledger
//!   substrate in production and by the adapters in this crate otherwise.

pub mod outbound;

pub use outbound::*;
