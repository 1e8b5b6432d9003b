//! # Domain Layer
//!
//! Entities, relationship id sets, key scheme and errors. No I/O.

pub mod entities;
pub mod errors;
pub mod id_set;
pub mod keys;

pub use entities::{
    Certificate, Class, ClassStatus, ContactInfo, Course, ProfileUpdate, Record, Score, Student,
    Subject, Teacher,
};
pub use errors::{AcademyError, ErrorKind, ErrorPayload};
pub use id_set::IdSet;
pub use keys::{EntityKey, EntityKind};
