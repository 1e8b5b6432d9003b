mod credential;
mod static_identity;

pub use credential::CredentialClaims;
pub use static_identity::StaticIdentity;
