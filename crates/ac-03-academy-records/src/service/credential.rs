//! # Credential Issuance Workflow
//!
//! A certificate is minted only for a student enrolled in the course who
//! holds a recorded score for every subject of that course. Presence of a
//! score is the bar, not its value.

use ac_01_record_store::KeyValueStore;
use ac_02_identity_gate::{Caller, Role};
use tracing::instrument;

use super::AcademyService;
use crate::domain::entities::{Certificate, Score};
use crate::domain::errors::AcademyError;
use crate::domain::keys::{EntityKey, EntityKind};
use crate::repository::{Repository, UnitOfWork};

impl<S: KeyValueStore> AcademyService<S> {
    /// Self-service: the caller must be the student being certified.
    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn create_certificate(
        &self,
        caller: &Caller,
        certificate_id: &str,
        course_id: &str,
        student_id: &str,
        issue_date: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_self(caller, Role::Learner, student_id))?;
        self.execute("CreateCertificate", |repo| {
            create_certificate(repo, certificate_id, course_id, student_id, issue_date)
        })
    }

    /// Record a score. The caller must be the teacher assigned to the class.
    #[instrument(skip(self, caller), fields(org = %caller.organization_id))]
    pub fn create_score(
        &self,
        caller: &Caller,
        teacher_username: &str,
        class_id: &str,
        student_id: &str,
        value: &str,
    ) -> Result<(), AcademyError> {
        self.gate(self.policy.require_self(caller, Role::Academy, teacher_username))?;
        self.execute("CreateScore", |repo| {
            create_score(repo, teacher_username, class_id, student_id, value)
        })
    }
}

fn create_certificate(
    repo: &Repository<'_>,
    certificate_id: &str,
    course_id: &str,
    student_id: &str,
    issue_date: &str,
) -> Result<UnitOfWork, AcademyError> {
    repo.ensure_absent(&EntityKey::certificate(certificate_id))?;

    let course = repo.course(course_id)?;
    let mut student = repo.student(student_id)?;

    let held: Vec<Certificate> = repo.load_all(&student.certificate_ids, EntityKey::certificate)?;
    if held.iter().any(|c| c.course_id == course_id) {
        return Err(AcademyError::AlreadyIssued {
            student: student_id.to_string(),
            course: course_id.to_string(),
        });
    }

    if !course.student_ids.contains(student_id) {
        return Err(AcademyError::NotEnrolled {
            student: student_id.to_string(),
            course: course_id.to_string(),
        });
    }

    let mut missing = Vec::new();
    for subject_id in &course.subject_ids {
        if !repo.exists(&EntityKey::score(subject_id, student_id))? {
            missing.push(subject_id.clone());
        }
    }
    if !missing.is_empty() {
        return Err(AcademyError::IncompleteSubjects {
            student: student_id.to_string(),
            course: course_id.to_string(),
            missing,
        });
    }

    let certificate = Certificate {
        id: certificate_id.to_string(),
        course_id: course_id.to_string(),
        student_username: student_id.to_string(),
        issue_date: issue_date.to_string(),
    };
    student.certificate_ids.insert(certificate_id);

    let mut uow = repo.unit_of_work();
    uow.put(&student)?;
    uow.put(&certificate)?;
    Ok(uow)
}

fn parse_score(value: &str) -> Result<f64, AcademyError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AcademyError::InvalidArgument(format!("score '{}' is not a finite number", value)))
}

fn create_score(
    repo: &Repository<'_>,
    teacher_username: &str,
    class_id: &str,
    student_id: &str,
    value: &str,
) -> Result<UnitOfWork, AcademyError> {
    let value = parse_score(value)?;
    repo.student(student_id)?;
    let class = repo.class(class_id)?;

    if class.teacher_username.as_deref() != Some(teacher_username) {
        return Err(AcademyError::PermissionDenied(format!(
            "{} does not teach class {}",
            teacher_username, class_id
        )));
    }

    if !class.status.accepts_scores() {
        return Err(AcademyError::InvalidState {
            class_id: class_id.to_string(),
            status: class.status,
            action: "record scores",
        });
    }

    if !class.student_ids.contains(student_id) {
        return Err(AcademyError::NotRegistered {
            student: student_id.to_string(),
            class_id: class_id.to_string(),
        });
    }

    let key = EntityKey::score(&class.subject_id, student_id);
    if repo.exists(&key)? {
        return Err(AcademyError::AlreadyExists {
            kind: EntityKind::Score,
            id: key.id().to_string(),
        });
    }

    let mut uow = repo.unit_of_work();
    uow.put(&Score {
        subject_id: class.subject_id,
        student_username: student_id.to_string(),
        value,
    })?;
    Ok(uow)
}
