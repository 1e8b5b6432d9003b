//! Key scheme of the flat record namespace.
//!
//! | Kind | Key |
//! |------|-----|
//! | Course | `Course-<id>` |
//! | Subject | `Subject-<id>` |
//! | Class | `Class-<id>` |
//! | Teacher | `Teacher-<username>` |
//! | Student | `Student-<username>` |
//! | Certificate | `Certificate-<id>` |
//! | Score | `Score- Subject-<subjectId> Student-<username>` |

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Course,
    Subject,
    Class,
    Teacher,
    Student,
    Score,
    Certificate,
}

impl EntityKind {
    /// Key prefix shared by every record of this kind.
    pub const fn prefix(self) -> &'static str {
        match self {
            EntityKind::Course => "Course-",
            EntityKind::Subject => "Subject-",
            EntityKind::Class => "Class-",
            EntityKind::Teacher => "Teacher-",
            EntityKind::Student => "Student-",
            EntityKind::Score => "Score-",
            EntityKind::Certificate => "Certificate-",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Course => "Course",
            EntityKind::Subject => "Subject",
            EntityKind::Class => "Class",
            EntityKind::Teacher => "Teacher",
            EntityKind::Student => "Student",
            EntityKind::Score => "Score",
            EntityKind::Certificate => "Certificate",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage key of one record, remembering the kind and natural id it was
/// built from for error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    kind: EntityKind,
    id: String,
    raw: String,
}

impl EntityKey {
    fn simple(kind: EntityKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
            raw: format!("{}{}", kind.prefix(), id),
        }
    }

    pub fn course(id: &str) -> Self {
        Self::simple(EntityKind::Course, id)
    }

    pub fn subject(id: &str) -> Self {
        Self::simple(EntityKind::Subject, id)
    }

    pub fn class(id: &str) -> Self {
        Self::simple(EntityKind::Class, id)
    }

    pub fn teacher(username: &str) -> Self {
        Self::simple(EntityKind::Teacher, username)
    }

    pub fn student(username: &str) -> Self {
        Self::simple(EntityKind::Student, username)
    }

    pub fn certificate(id: &str) -> Self {
        Self::simple(EntityKind::Certificate, id)
    }

    /// Composite key of the score a student holds for a subject.
    pub fn score(subject_id: &str, student_username: &str) -> Self {
        let id = format!(
            "{}{} {}{}",
            EntityKind::Subject.prefix(),
            subject_id,
            EntityKind::Student.prefix(),
            student_username
        );
        Self {
            kind: EntityKind::Score,
            raw: format!("{} {}", EntityKind::Score.prefix(), id),
            id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Natural id (for scores, the `Subject-.. Student-..` pair).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.raw.as_bytes()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
