//! # Enrollment & Capacity Workflow
//!
//! Class registration state machine:
//!
//! ```text
//! Open --closeRegisterClass--> Closed
//! ```
//!
//! Registration and cancellation are only accepted while `Open`. A student
//! holds at most one class per subject, and a class never holds more
//! students than its capacity.

use ac_01_record_store::KeyValueStore;
use ac_02_identity_gate::{Caller, Role};
use tracing::instrument;

use super::AcademyService;
use crate::domain::entities::{Class, ClassStatus};
use crate::domain::errors::AcademyError;
use crate::domain::keys::{EntityKey, EntityKind};
use crate::repository::{Repository, UnitOfWork};

impl<S: KeyValueStore> AcademyService<S> {
    /// Self-service: the caller must be the student.
    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn register_student_in_class(
        &self,
        caller: &Caller,
        student_id: &str,
        class_id: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_self(caller, Role::Learner, student_id))?;
        self.execute("StudentRegisterClass", |repo| {
            register_student_in_class(repo, student_id, class_id)
        })
    }

    /// Self-service: the caller must be the student.
    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn cancel_student_class_registration(
        &self,
        caller: &Caller,
        student_id: &str,
        class_id: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_self(caller, Role::Learner, student_id))?;
        self.execute("StudentCancelRegisterClass", |repo| {
            cancel_student_class_registration(repo, student_id, class_id)
        })
    }

    /// Self-service: the caller must be the student. Courses have no
    /// capacity limit.
    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn register_student_in_course(
        &self,
        caller: &Caller,
        student_id: &str,
        course_id: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_self(caller, Role::Learner, student_id))?;
        self.execute("StudentRegisterCourse", |repo| {
            register_student_in_course(repo, student_id, course_id)
        })
    }

    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn close_register_class(&self, caller: &Caller, class_id: &str) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("CloseRegisterClass", |repo| close_register_class(repo, class_id))
    }
}

fn require_open(class: &Class, action: &'static str) -> Result<(), AcademyError> {
    if class.status.accepts_registrations() {
        return Ok(());
    }
    Err(AcademyError::InvalidState {
        class_id: class.id.clone(),
        status: class.status,
        action,
    })
}

fn register_student_in_class(
    repo: &Repository<'_>,
    student_id: &str,
    class_id: &str,
) -> Result<UnitOfWork, AcademyError> {
    let mut student = repo.student(student_id)?;
    let mut class = repo.class(class_id)?;

    require_open(&class, "accept registrations")?;

    if student.class_ids.contains(class_id) || class.student_ids.contains(student_id) {
        return Err(AcademyError::AlreadyRegistered {
            student: student_id.to_string(),
            kind: EntityKind::Class,
            id: class_id.to_string(),
        });
    }

    let current: Vec<Class> = repo.load_all(&student.class_ids, EntityKey::class)?;
    if let Some(clash) = current.iter().find(|c| c.subject_id == class.subject_id) {
        return Err(AcademyError::DuplicateSubject {
            student: student_id.to_string(),
            subject_id: class.subject_id.clone(),
            existing_class: clash.id.clone(),
        });
    }

    if class.is_full() {
        return Err(AcademyError::ClassFull {
            class_id: class_id.to_string(),
            capacity: class.capacity,
        });
    }

    student.class_ids.insert(class_id);
    class.student_ids.insert(student_id);

    let mut uow = repo.unit_of_work();
    uow.put(&student)?;
    uow.put(&class)?;
    Ok(uow)
}

fn cancel_student_class_registration(
    repo: &Repository<'_>,
    student_id: &str,
    class_id: &str,
) -> Result<UnitOfWork, AcademyError> {
    let mut student = repo.student(student_id)?;
    let mut class = repo.class(class_id)?;

    require_open(&class, "cancel registrations")?;

    if !student.class_ids.contains(class_id) {
        return Err(AcademyError::NotRegistered {
            student: student_id.to_string(),
            class_id: class_id.to_string(),
        });
    }

    student.class_ids.remove(class_id);
    class.student_ids.remove(student_id);

    let mut uow = repo.unit_of_work();
    uow.put(&student)?;
    uow.put(&class)?;
    Ok(uow)
}

fn register_student_in_course(
    repo: &Repository<'_>,
    student_id: &str,
    course_id: &str,
) -> Result<UnitOfWork, AcademyError> {
    let mut student = repo.student(student_id)?;
    let mut course = repo.course(course_id)?;

    if student.course_ids.contains(course_id) {
        return Err(AcademyError::AlreadyRegistered {
            student: student_id.to_string(),
            kind: EntityKind::Course,
            id: course_id.to_string(),
        });
    }

    student.course_ids.insert(course_id);
    course.student_ids.insert(student_id);

    let mut uow = repo.unit_of_work();
    uow.put(&student)?;
    uow.put(&course)?;
    Ok(uow)
}

fn close_register_class(repo: &Repository<'_>, class_id: &str) -> Result<UnitOfWork, AcademyError> {
    let mut class = repo.class(class_id)?;
    require_open(&class, "close registration")?;
    class.status = ClassStatus::Closed;

    let mut uow = repo.unit_of_work();
    uow.put(&class)?;
    Ok(uow)
}
