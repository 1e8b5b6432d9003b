//! # Domain Errors
//!
//! `AcademyError` is what every operation returns. `ErrorPayload` is its
//! serializable form handed back across the dispatch boundary.

use ac_01_record_store::KVStoreError;
use ac_02_identity_gate::IdentityError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::ClassStatus;
use super::keys::EntityKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcademyError {
    /// Caller identity could not be resolved.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Wrong organisation or attribute for the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("{kind} does not exist - {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("{kind} already exists - {id}")]
    AlreadyExists { kind: EntityKind, id: String },

    #[error("student {student} is already registered in {kind} {id}")]
    AlreadyRegistered {
        student: String,
        kind: EntityKind,
        id: String,
    },

    #[error("{child_kind} {child} is already linked to {parent_kind} {parent}")]
    AlreadyLinked {
        parent_kind: EntityKind,
        parent: String,
        child_kind: EntityKind,
        child: String,
    },

    #[error("student {student} already holds a certificate for course {course}")]
    AlreadyIssued { student: String, course: String },

    #[error("class {class_id} is {status}, cannot {action}")]
    InvalidState {
        class_id: String,
        status: ClassStatus,
        action: &'static str,
    },

    #[error("class {class_id} is full (capacity {capacity})")]
    ClassFull { class_id: String, capacity: u64 },

    #[error("student {student} already studies subject {subject_id} in class {existing_class}")]
    DuplicateSubject {
        student: String,
        subject_id: String,
        existing_class: String,
    },

    #[error("student {student} is not registered in class {class_id}")]
    NotRegistered { student: String, class_id: String },

    #[error("student {student} is not enrolled in course {course}")]
    NotEnrolled { student: String, course: String },

    #[error("student {student} has no score for subjects {missing:?} of course {course}")]
    IncompleteSubjects {
        student: String,
        course: String,
        missing: Vec<String>,
    },

    #[error("{kind} {id} still references {dependents} record(s)")]
    NotEmpty {
        kind: EntityKind,
        id: String,
        dependents: usize,
    },

    #[error("serialization failure: {0}")]
    SerializationFailure(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error(transparent)]
    Storage(#[from] KVStoreError),
}

impl AcademyError {
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        AcademyError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn already_exists(kind: EntityKind, id: &str) -> Self {
        AcademyError::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AcademyError::Authentication(_) => ErrorKind::AuthenticationError,
            AcademyError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            AcademyError::NotFound { .. } => ErrorKind::NotFound,
            AcademyError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            AcademyError::AlreadyRegistered { .. } => ErrorKind::AlreadyRegistered,
            AcademyError::AlreadyLinked { .. } => ErrorKind::AlreadyLinked,
            AcademyError::AlreadyIssued { .. } => ErrorKind::AlreadyIssued,
            AcademyError::InvalidState { .. } => ErrorKind::InvalidState,
            AcademyError::ClassFull { .. } => ErrorKind::ClassFull,
            AcademyError::DuplicateSubject { .. } => ErrorKind::DuplicateSubject,
            AcademyError::NotRegistered { .. } => ErrorKind::NotRegistered,
            AcademyError::NotEnrolled { .. } => ErrorKind::NotEnrolled,
            AcademyError::IncompleteSubjects { .. } => ErrorKind::IncompleteSubjects,
            AcademyError::NotEmpty { .. } => ErrorKind::NotEmpty,
            AcademyError::SerializationFailure(_) => ErrorKind::SerializationFailure,
            AcademyError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AcademyError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            AcademyError::Storage(_) => ErrorKind::StorageError,
        }
    }
}

impl From<IdentityError> for AcademyError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Authentication(message) => AcademyError::Authentication(message),
            IdentityError::PermissionDenied(message) => AcademyError::PermissionDenied(message),
        }
    }
}

/// Failure category as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    AuthenticationError,
    PermissionDenied,
    NotFound,
    AlreadyExists,
    AlreadyRegistered,
    AlreadyLinked,
    AlreadyIssued,
    InvalidState,
    ClassFull,
    DuplicateSubject,
    NotRegistered,
    NotEnrolled,
    IncompleteSubjects,
    NotEmpty,
    SerializationFailure,
    InvalidArgument,
    UnknownOperation,
    StorageError,
}

/// Structured failure returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<AcademyError> for ErrorPayload {
    fn from(err: AcademyError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}
