use thiserror::Error;

/// Errors raised by the identity gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The caller's credential could not be resolved.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The caller is not allowed to perform the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}
