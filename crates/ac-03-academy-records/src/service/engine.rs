//! # Relationship Consistency Engine
//!
//! Operations that touch more than one entity. Each keeps both sides of an
//! edge in step and never leaves a dangling id behind.

use ac_01_record_store::KeyValueStore;
use ac_02_identity_gate::{Caller, Role};
use tracing::instrument;

use super::AcademyService;
use crate::domain::entities::{Class, ClassStatus, Course, Student, Teacher};
use crate::domain::errors::AcademyError;
use crate::domain::keys::{EntityKey, EntityKind};
use crate::repository::{Repository, UnitOfWork};

impl<S: KeyValueStore> AcademyService<S> {
    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn add_subject_to_course(
        &self,
        caller: &Caller,
        course_id: &str,
        subject_id: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("AddSubjectToCourse", |repo| {
            add_subject_to_course(repo, course_id, subject_id)
        })
    }

    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn remove_subject_from_course(
        &self,
        caller: &Caller,
        course_id: &str,
        subject_id: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("RemoveSubjectFromCourse", |repo| {
            remove_subject_from_course(repo, course_id, subject_id)
        })
    }

    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn add_class_to_teacher(
        &self,
        caller: &Caller,
        class_id: &str,
        teacher_username: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("AddClassToTeacher", |repo| {
            add_class_to_teacher(repo, class_id, teacher_username)
        })
    }

    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn delete_class(&self, caller: &Caller, class_id: &str) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("DeleteClass", |repo| delete_class(repo, class_id))
    }

    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn delete_course(&self, caller: &Caller, course_id: &str) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("DeleteCourse", |repo| delete_course(repo, course_id))
    }

    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn delete_subject(&self, caller: &Caller, subject_id: &str) -> Result<(), AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.execute("DeleteSubject", |repo| delete_subject(repo, subject_id))
    }
}

fn add_subject_to_course(
    repo: &Repository<'_>,
    course_id: &str,
    subject_id: &str,
) -> Result<UnitOfWork, AcademyError> {
    let mut course = repo.course(course_id)?;
    repo.subject(subject_id)?;

    if !course.subject_ids.insert(subject_id) {
        return Err(AcademyError::AlreadyLinked {
            parent_kind: EntityKind::Course,
            parent: course_id.to_string(),
            child_kind: EntityKind::Subject,
            child: subject_id.to_string(),
        });
    }

    let mut uow = repo.unit_of_work();
    uow.put(&course)?;
    Ok(uow)
}

/// An absent subject is a no-op: nothing is staged.
fn remove_subject_from_course(
    repo: &Repository<'_>,
    course_id: &str,
    subject_id: &str,
) -> Result<UnitOfWork, AcademyError> {
    let mut course = repo.course(course_id)?;
    let mut uow = repo.unit_of_work();
    if course.subject_ids.remove(subject_id) {
        uow.put(&course)?;
    }
    Ok(uow)
}

/// Assigns the class to `teacher_username`, detaching it from any previous
/// teacher in the same unit of work.
fn add_class_to_teacher(
    repo: &Repository<'_>,
    class_id: &str,
    teacher_username: &str,
) -> Result<UnitOfWork, AcademyError> {
    let mut class = repo.class(class_id)?;
    let mut teacher = repo.teacher(teacher_username)?;

    if teacher.class_ids.contains(class_id) {
        return Err(AcademyError::AlreadyLinked {
            parent_kind: EntityKind::Teacher,
            parent: teacher_username.to_string(),
            child_kind: EntityKind::Class,
            child: class_id.to_string(),
        });
    }

    let mut uow = repo.unit_of_work();
    if let Some(previous) = class.teacher_username.as_deref() {
        if previous != teacher_username {
            let mut previous: Teacher = repo.teacher(previous)?;
            previous.class_ids.remove(class_id);
            uow.put(&previous)?;
        }
    }

    teacher.class_ids.insert(class_id);
    class.teacher_username = Some(teacher_username.to_string());
    uow.put(&teacher)?;
    uow.put(&class)?;
    Ok(uow)
}

/// Only open classes can be deleted. Every back-reference is loaded first;
/// a missing subject, assigned teacher or enrolled student aborts the
/// deletion before anything is staged. A class with no teacher assigned is
/// still deletable; only the teacher cleanup is skipped.
fn delete_class(repo: &Repository<'_>, class_id: &str) -> Result<UnitOfWork, AcademyError> {
    let class: Class = repo.class(class_id)?;
    if class.status != ClassStatus::Open {
        return Err(AcademyError::InvalidState {
            class_id: class_id.to_string(),
            status: class.status,
            action: "delete it",
        });
    }

    let mut subject = repo.subject(&class.subject_id)?;
    let mut teacher = class
        .teacher_username
        .as_deref()
        .map(|username| repo.teacher(username))
        .transpose()?;
    let mut students: Vec<Student> = repo.load_all(&class.student_ids, EntityKey::student)?;

    let mut uow = repo.unit_of_work();
    for student in &mut students {
        student.class_ids.remove(class_id);
        uow.put(&*student)?;
    }
    subject.class_ids.remove(class_id);
    uow.put(&subject)?;
    if let Some(teacher) = teacher.as_mut() {
        teacher.class_ids.remove(class_id);
        uow.put(&*teacher)?;
    }
    uow.delete(&EntityKey::class(class_id));
    Ok(uow)
}

/// Deletes the course and drops it from every enrolled student.
fn delete_course(repo: &Repository<'_>, course_id: &str) -> Result<UnitOfWork, AcademyError> {
    let course: Course = repo.course(course_id)?;
    let mut students: Vec<Student> = repo.load_all(&course.student_ids, EntityKey::student)?;

    let mut uow = repo.unit_of_work();
    for student in &mut students {
        student.course_ids.remove(course_id);
        uow.put(&*student)?;
    }
    uow.delete(&EntityKey::course(course_id));
    Ok(uow)
}

/// Refuses while any class still belongs to the subject. Courses listing
/// the subject are unlinked.
fn delete_subject(repo: &Repository<'_>, subject_id: &str) -> Result<UnitOfWork, AcademyError> {
    let subject = repo.subject(subject_id)?;
    if !subject.class_ids.is_empty() {
        return Err(AcademyError::NotEmpty {
            kind: EntityKind::Subject,
            id: subject_id.to_string(),
            dependents: subject.class_ids.len(),
        });
    }

    let mut uow = repo.unit_of_work();
    for mut course in repo.scan::<Course>()? {
        if course.subject_ids.remove(subject_id) {
            uow.put(&course)?;
        }
    }
    uow.delete(&EntityKey::subject(subject_id));
    Ok(uow)
}
