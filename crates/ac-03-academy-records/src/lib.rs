//! # Academy Records (ac-03)
//!
//! Business-rule layer keeping an academic-records graph consistent on top of
//! an ordered key-value store.
//!
//! ## Architecture
//!
//! ```text
//! invoke(function, args)
//!     │
//!     ▼
//! Identity Gate ──► Repository (load) ──► Engine / Workflows (validate)
//!                                               │
//!                                               ▼
//!                                   UnitOfWork ──► atomic_batch_write
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Enforced by |
//! |-----------|-------------|
//! | Symmetric back-references | every linking operation writes both sides in one unit of work |
//! | No duplicate ids | [`domain::IdSet`] |
//! | `students <= capacity` | enrollment workflow, `update_class_info` |
//! | One class per subject per student | enrollment workflow |
//! | No dangling ids after delete | engine cascades |
//! | One certificate per (course, student) | credential workflow |
//!
//! ## Crate Structure
//!
//! - `domain/` - Entities, `IdSet`, key scheme, errors
//! - `repository/` - Typed reads, `UnitOfWork`, record codec
//! - `service/` - Gated entry points: engine, enrollment, credential, catalog, queries
//! - `ports/` - `Operation` wire table
//! - `adapters/` - `invoke` dispatch

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod repository;
pub mod service;

pub use adapters::invoke;
pub use domain::{
    AcademyError, Certificate, Class, ClassStatus, ContactInfo, Course, EntityKey, EntityKind,
    ErrorKind, ErrorPayload, IdSet, ProfileUpdate, Score, Student, Subject, Teacher,
};
pub use ports::Operation;
pub use repository::{RecordCodec, Repository, UnitOfWork};
pub use service::{AcademyService, ClassDetails, ServiceConfig, ServiceStats};
