//! # Catalog
//!
//! Record creation and descriptive updates. Only `create_class` touches a
//! second entity (the subject's class list).

use ac_01_record_store::KeyValueStore;
use ac_02_identity_gate::{Caller, Role};
use tracing::instrument;

use super::AcademyService;
use crate::domain::entities::{
    set_if_present, Class, ClassStatus, Course, ProfileUpdate, Record, Student, Subject, Teacher,
};
use crate::domain::errors::AcademyError;
use crate::domain::keys::EntityKey;
use crate::repository::{Repository, UnitOfWork};

/// Descriptive fields of a class. On update, empty strings leave a field
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDetails {
    pub code: String,
    pub room: String,
    pub time: String,
    pub start_date: String,
    pub end_date: String,
    pub repeat: String,
}

fn parse_capacity(capacity: &str) -> Result<u64, AcademyError> {
    capacity
        .trim()
        .parse::<u64>()
        .map_err(|_| AcademyError::InvalidArgument(format!("capacity '{}' is not an unsigned integer", capacity)))
}

impl<S: KeyValueStore> AcademyService<S> {
    /// The academy may create any student; a learner may create their own
    /// record.
    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn create_student(&self, caller: &Caller, username: &str, fullname: &str) -> Result<(), AcademyError> {
        if self.policy.role_of(caller) != Some(Role::Academy) {
            self.gate(self.policy.require_self(caller, Role::Learner, username))?;
        }
        self.execute("CreateStudent", |repo| {
            let student = Student::new(username, fullname);
            create(repo, &student)
        })
    }

    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn create_teacher(&self, caller: &Caller, username: &str, fullname: &str) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("CreateTeacher", |repo| create(repo, &Teacher::new(username, fullname)))
    }

    #[instrument(skip(self, caller, short_description, description), fields(org = %caller.organization_id))]
    pub fn create_subject(
        &self,
        caller: &Caller,
        id: &str,
        code: &str,
        name: &str,
        short_description: &str,
        description: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("CreateSubject", |repo| {
            create(repo, &Subject::new(id, code, name, short_description, description))
        })
    }

    #[instrument(skip(self, caller, short_description, description), fields(org = %caller.organization_id))]
    pub fn create_course(
        &self,
        caller: &Caller,
        id: &str,
        code: &str,
        name: &str,
        short_description: &str,
        description: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("CreateCourse", |repo| {
            create(repo, &Course::new(id, code, name, short_description, description))
        })
    }

    /// Creates an open class and links it to its subject.
    #[instrument(skip(self, caller, details), fields(org = %caller.organization_id))]
    pub fn create_class(
        &self,
        caller: &Caller,
        id: &str,
        details: &ClassDetails,
        subject_id: &str,
        capacity: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("CreateClass", |repo| {
            let capacity = parse_capacity(capacity)?;
            repo.ensure_absent(&EntityKey::class(id))?;
            let mut subject = repo.subject(subject_id)?;

            let class = Class {
                id: id.to_string(),
                subject_id: subject_id.to_string(),
                code: details.code.clone(),
                room: details.room.clone(),
                time: details.time.clone(),
                status: ClassStatus::Open,
                start_date: details.start_date.clone(),
                end_date: details.end_date.clone(),
                repeat: details.repeat.clone(),
                student_ids: Default::default(),
                capacity,
                teacher_username: None,
            };
            subject.class_ids.insert(id);

            let mut uow = repo.unit_of_work();
            uow.put(&class)?;
            uow.put(&subject)?;
            Ok(uow)
        })
    }

    #[instrument(skip(self, caller, short_description, description), fields(org = %caller.organization_id))]
    pub fn update_course_info(
        &self,
        caller: &Caller,
        id: &str,
        code: &str,
        name: &str,
        short_description: &str,
        description: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("UpdateCourseInfo", |repo| {
            let mut course = repo.course(id)?;
            set_if_present(&mut course.code, code);
            set_if_present(&mut course.name, name);
            set_if_present(&mut course.short_description, short_description);
            set_if_present(&mut course.description, description);
            single(repo, &course)
        })
    }

    #[instrument(skip(self, caller, short_description, description), fields(org = %caller.organization_id))]
    pub fn update_subject_info(
        &self,
        caller: &Caller,
        id: &str,
        code: &str,
        name: &str,
        short_description: &str,
        description: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("UpdateSubjectInfo", |repo| {
            let mut subject = repo.subject(id)?;
            set_if_present(&mut subject.code, code);
            set_if_present(&mut subject.name, name);
            set_if_present(&mut subject.short_description, short_description);
            set_if_present(&mut subject.description, description);
            single(repo, &subject)
        })
    }

    /// An empty `capacity` keeps the current one. A new capacity below the
    /// current enrollment is refused.
    #[instrument(skip(self, caller, details), fields(org = %caller.organization_id))]
    pub fn update_class_info(
        &self,
        caller: &Caller,
        id: &str,
        details: &ClassDetails,
        capacity: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("UpdateClassInfo", |repo| {
            let capacity = match capacity.trim() {
                "" => None,
                value => Some(parse_capacity(value)?),
            };
            let mut class = repo.class(id)?;

            if let Some(capacity) = capacity {
                let enrolled = class.student_ids.len() as u64;
                if capacity < enrolled {
                    return Err(AcademyError::InvalidArgument(format!(
                        "capacity {} is below current enrollment {} of class {}",
                        capacity, enrolled, id
                    )));
                }
                class.capacity = capacity;
            }
            set_if_present(&mut class.code, &details.code);
            set_if_present(&mut class.room, &details.room);
            set_if_present(&mut class.time, &details.time);
            set_if_present(&mut class.start_date, &details.start_date);
            set_if_present(&mut class.end_date, &details.end_date);
            set_if_present(&mut class.repeat, &details.repeat);
            single(repo, &class)
        })
    }

    /// Learners edit their own student record; the academy edits teacher
    /// records.
    #[instrument(skip(self, caller, update), fields(org = %caller.organization_id))]
    pub fn update_user_info(
        &self,
        caller: &Caller,
        username: &str,
        update: &ProfileUpdate,
    ) -> Result<(), AcademyError> {
        match self.gate(self.policy.require_any_org(caller, &[Role::Academy, Role::Learner]))? {
            Role::Learner => {
                self.gate(self.policy.require_self(caller, Role::Learner, username))?;
                self.execute("UpdateUserInfo", |repo| {
                    let mut student = repo.student(username)?;
                    student.apply_profile(update);
                    single(repo, &student)
                })
            }
            Role::Academy => self.execute("UpdateUserInfo", |repo| {
                let mut teacher = repo.teacher(username)?;
                teacher.apply_profile(update);
                single(repo, &teacher)
            }),
        }
    }

    /// Sets the avatar on the caller's own record. An empty avatar is a
    /// no-op write.
    #[instrument(skip(self, caller, avatar), fields(org = %caller.organization_id))]
    pub fn update_user_avatar(&self, caller: &Caller, avatar: &str) -> Result<(), AcademyError> {
        let role = self.gate(self.policy.require_any_org(caller, &[Role::Academy, Role::Learner]))?;
        let username = self.gate(self.policy.own_attribute(caller))?;
        self.execute("UpdateUserAvatar", |repo| match role {
            Role::Learner => {
                let mut student = repo.student(username)?;
                set_if_present(&mut student.contact_info.avatar, avatar);
                single(repo, &student)
            }
            Role::Academy => {
                let mut teacher = repo.teacher(username)?;
                set_if_present(&mut teacher.contact_info.avatar, avatar);
                single(repo, &teacher)
            }
        })
    }
}

/// Stage a brand-new record, failing if its key is taken.
fn create<T: Record>(repo: &Repository<'_>, record: &T) -> Result<UnitOfWork, AcademyError> {
    repo.ensure_absent(&record.key())?;
    single(repo, record)
}

fn single<T: Record>(repo: &Repository<'_>, record: &T) -> Result<UnitOfWork, AcademyError> {
    let mut uow = repo.unit_of_work();
    uow.put(record)?;
    Ok(uow)
}
