//! # Entities
//!
//! The seven record shapes. Each entity stores the *other side* of its
//! relationships inline as an [`IdSet`]:
//!
//! | Edge | Left field | Right field |
//! |------|------------|-------------|
//! | Course ↔ Subject | `Course.subject_ids` | (none, one-sided) |
//! | Course ↔ Student | `Course.student_ids` | `Student.course_ids` |
//! | Subject ↔ Class | `Subject.class_ids` | `Class.subject_id` |
//! | Teacher ↔ Class | `Teacher.class_ids` | `Class.teacher_username` |
//! | Student ↔ Class | `Student.class_ids` | `Class.student_ids` |
//! | Student → Certificate | `Student.certificate_ids` | `Certificate.student_username` |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::id_set::IdSet;
use super::keys::{EntityKey, EntityKind};

/// A storable entity.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn key(&self) -> EntityKey;
}

/// Overwrite `field` unless `value` is empty.
pub(crate) fn set_if_present(field: &mut String, value: &str) {
    if !value.is_empty() {
        *field = value.to_string();
    }
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    pub short_description: String,
    pub description: String,
    #[serde(default)]
    pub subject_ids: IdSet,
    #[serde(default)]
    pub student_ids: IdSet,
}

impl Course {
    pub fn new(id: &str, code: &str, name: &str, short_description: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            short_description: short_description.to_string(),
            description: description.to_string(),
            subject_ids: IdSet::new(),
            student_ids: IdSet::new(),
        }
    }
}

impl Record for Course {
    const KIND: EntityKind = EntityKind::Course;

    fn key(&self) -> EntityKey {
        EntityKey::course(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub code: String,
    pub name: String,
    pub short_description: String,
    pub description: String,
    #[serde(default)]
    pub class_ids: IdSet,
}

impl Subject {
    pub fn new(id: &str, code: &str, name: &str, short_description: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            short_description: short_description.to_string(),
            description: description.to_string(),
            class_ids: IdSet::new(),
        }
    }
}

impl Record for Subject {
    const KIND: EntityKind = EntityKind::Subject;

    fn key(&self) -> EntityKey {
        EntityKey::subject(&self.id)
    }
}

// =============================================================================
// CLASS
// =============================================================================

/// Registration lifecycle of a class.
///
/// `Open` is initial. `closeRegisterClass` moves `Open -> Closed`. No
/// operation moves a class into `InProgress` or `Completed`; scores can only
/// be recorded for `InProgress` classes, so score entry stays unreachable
/// until a transition into that state is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassStatus {
    Open,
    Closed,
    InProgress,
    Completed,
}

impl ClassStatus {
    /// Whether new registrations are accepted.
    pub fn accepts_registrations(self) -> bool {
        self == ClassStatus::Open
    }

    /// Whether scores may be recorded.
    pub fn accepts_scores(self) -> bool {
        self == ClassStatus::InProgress
    }
}

impl std::fmt::Display for ClassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClassStatus::Open => "Open",
            ClassStatus::Closed => "Closed",
            ClassStatus::InProgress => "InProgress",
            ClassStatus::Completed => "Completed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub subject_id: String,
    pub code: String,
    pub room: String,
    pub time: String,
    pub status: ClassStatus,
    pub start_date: String,
    pub end_date: String,
    pub repeat: String,
    #[serde(default)]
    pub student_ids: IdSet,
    pub capacity: u64,
    #[serde(default)]
    pub teacher_username: Option<String>,
}

impl Class {
    pub fn is_full(&self) -> bool {
        self.student_ids.len() as u64 >= self.capacity
    }
}

impl Record for Class {
    const KIND: EntityKind = EntityKind::Class;

    fn key(&self) -> EntityKey {
        EntityKey::class(&self.id)
    }
}

// =============================================================================
// PEOPLE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub sex: String,
    pub birthday: String,
    pub avatar: String,
    pub country: String,
}

/// Profile fields a user may edit. Empty strings mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub fullname: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub sex: String,
    pub birthday: String,
    pub country: String,
}

impl ProfileUpdate {
    fn apply(&self, fullname: &mut String, info: &mut ContactInfo) {
        set_if_present(fullname, &self.fullname);
        set_if_present(&mut info.phone_number, &self.phone_number);
        set_if_present(&mut info.email, &self.email);
        set_if_present(&mut info.address, &self.address);
        set_if_present(&mut info.sex, &self.sex);
        set_if_present(&mut info.birthday, &self.birthday);
        set_if_present(&mut info.country, &self.country);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub username: String,
    pub fullname: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub class_ids: IdSet,
}

impl Teacher {
    pub fn new(username: &str, fullname: &str) -> Self {
        Self {
            username: username.to_string(),
            fullname: fullname.to_string(),
            contact_info: ContactInfo::default(),
            class_ids: IdSet::new(),
        }
    }

    pub fn apply_profile(&mut self, update: &ProfileUpdate) {
        update.apply(&mut self.fullname, &mut self.contact_info);
    }
}

impl Record for Teacher {
    const KIND: EntityKind = EntityKind::Teacher;

    fn key(&self) -> EntityKey {
        EntityKey::teacher(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub username: String,
    pub fullname: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub course_ids: IdSet,
    #[serde(default)]
    pub class_ids: IdSet,
    #[serde(default)]
    pub certificate_ids: IdSet,
}

impl Student {
    pub fn new(username: &str, fullname: &str) -> Self {
        Self {
            username: username.to_string(),
            fullname: fullname.to_string(),
            contact_info: ContactInfo::default(),
            course_ids: IdSet::new(),
            class_ids: IdSet::new(),
            certificate_ids: IdSet::new(),
        }
    }

    pub fn apply_profile(&mut self, update: &ProfileUpdate) {
        update.apply(&mut self.fullname, &mut self.contact_info);
    }
}

impl Record for Student {
    const KIND: EntityKind = EntityKind::Student;

    fn key(&self) -> EntityKey {
        EntityKey::student(&self.username)
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// A student's score in one subject. Looked up by composite key only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub subject_id: String,
    pub student_username: String,
    pub value: f64,
}

impl Record for Score {
    const KIND: EntityKind = EntityKind::Score;

    fn key(&self) -> EntityKey {
        EntityKey::score(&self.subject_id, &self.student_username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub course_id: String,
    pub student_username: String,
    pub issue_date: String,
}

impl Record for Certificate {
    const KIND: EntityKind = EntityKind::Certificate;

    fn key(&self) -> EntityKey {
        EntityKey::certificate(&self.id)
    }
}
