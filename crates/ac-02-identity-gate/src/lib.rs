//! # Identity Gate (ac-02)
//!
//! Resolves who is calling and decides whether they may.
//!
//! The credentialing layer hands us two facts about a caller: the
//! membership-service organisation id it belongs to, and optionally a
//! verified attribute bound to its credential (a username). Both are trusted
//! as given. Everything else is policy, kept in [`AccessPolicy`].
//!
//! ## Roles
//!
//! | Role | Default org id | May |
//! |------|----------------|-----|
//! | `Academy` | `AcademyMSP` | Manage the catalog, link and delete records, record scores |
//! | `Learner` | `StudentMSP` | Self-service enrollment and certificate requests |
//!
//! ## Crate Structure
//!
//! - `domain/` - `Caller`, `Role`, `IdentityConfig`, `AccessPolicy`, errors
//! - `ports/` - `IdentityProvider` driven port
//! - `adapters/` - `StaticIdentity`, `CredentialClaims`

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{CredentialClaims, StaticIdentity};
pub use domain::caller::{Caller, Role};
pub use domain::errors::IdentityError;
pub use domain::policy::{AccessPolicy, IdentityConfig};
pub use ports::IdentityProvider;
