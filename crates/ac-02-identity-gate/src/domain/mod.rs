pub mod caller;
pub mod errors;
pub mod policy;
