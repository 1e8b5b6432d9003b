//! # Driven Port
//!
//! Where the caller's identity comes from. Production wires this to the
//! credentialing layer; tests use `StaticIdentity`.

use crate::domain::caller::Caller;
use crate::domain::errors::IdentityError;

pub trait IdentityProvider {
    /// Resolve the caller of the current request.
    ///
    /// Fails with `IdentityError::Authentication` when the underlying
    /// credential cannot be parsed.
    fn resolve_caller(&self) -> Result<Caller, IdentityError>;
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn resolve_caller(&self) -> Result<Caller, IdentityError> {
        (**self).resolve_caller()
    }
}
