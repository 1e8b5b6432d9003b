//! # Operation Dispatch
//!
//! Maps `(function name, positional args)` onto the service. Mutations return
//! no payload; queries return a JSON snapshot.

use ac_01_record_store::KeyValueStore;
use ac_02_identity_gate::{Caller, IdentityProvider};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::entities::ProfileUpdate;
use crate::domain::errors::{AcademyError, ErrorPayload};
use crate::ports::inbound::Operation;
use crate::service::{AcademyService, ClassDetails};

/// Invoke `function` with `args` on behalf of the caller `identity` resolves.
pub fn invoke<S, I, A>(
    service: &AcademyService<S>,
    identity: &I,
    function: &str,
    args: &[A],
) -> Result<Option<Vec<u8>>, ErrorPayload>
where
    S: KeyValueStore,
    I: IdentityProvider + ?Sized,
    A: AsRef<str>,
{
    let result = route(service, identity, function, args);
    if let Err(e) = &result {
        warn!("[ac-03] {} failed: {}", function, e);
    }
    result.map_err(ErrorPayload::from)
}

fn route<S, I, A>(
    service: &AcademyService<S>,
    identity: &I,
    function: &str,
    args: &[A],
) -> Result<Option<Vec<u8>>, AcademyError>
where
    S: KeyValueStore,
    I: IdentityProvider + ?Sized,
    A: AsRef<str>,
{
    let op = Operation::from_name(function)
        .ok_or_else(|| AcademyError::UnknownOperation(function.to_string()))?;

    if args.len() != op.arity() {
        return Err(AcademyError::InvalidArgument(format!(
            "Incorrect number of arguments. Expecting {}",
            op.arity()
        )));
    }
    let a: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

    let caller = identity.resolve_caller()?;
    debug!("[ac-03] {} from {}", op, caller.organization_id);
    run(service, &caller, op, &a)
}

fn json<T: Serialize>(value: &T) -> Result<Option<Vec<u8>>, AcademyError> {
    serde_json::to_vec(value)
        .map(Some)
        .map_err(|e| AcademyError::SerializationFailure(e.to_string()))
}

fn class_details(a: &[&str]) -> ClassDetails {
    ClassDetails {
        code: a[0].to_string(),
        room: a[1].to_string(),
        time: a[2].to_string(),
        start_date: a[3].to_string(),
        end_date: a[4].to_string(),
        repeat: a[5].to_string(),
    }
}

/// `a` has exactly `op.arity()` elements.
fn run<S: KeyValueStore>(
    service: &AcademyService<S>,
    caller: &Caller,
    op: Operation,
    a: &[&str],
) -> Result<Option<Vec<u8>>, AcademyError> {
    use Operation::*;

    let s = service;
    let c = caller;
    match op {
        CreateStudent => s.create_student(c, a[0], a[1]).map(|_| None),
        CreateTeacher => s.create_teacher(c, a[0], a[1]).map(|_| None),
        CreateSubject => s.create_subject(c, a[0], a[1], a[2], a[3], a[4]).map(|_| None),
        CreateCourse => s.create_course(c, a[0], a[1], a[2], a[3], a[4]).map(|_| None),
        CreateClass => s
            .create_class(c, a[0], &class_details(&a[1..7]), a[7], a[8])
            .map(|_| None),
        UpdateCourseInfo => s
            .update_course_info(c, a[0], a[1], a[2], a[3], a[4])
            .map(|_| None),
        UpdateSubjectInfo => s
            .update_subject_info(c, a[0], a[1], a[2], a[3], a[4])
            .map(|_| None),
        UpdateClassInfo => s
            .update_class_info(c, a[0], &class_details(&a[1..7]), a[7])
            .map(|_| None),
        UpdateUserInfo => {
            let update = ProfileUpdate {
                fullname: a[1].to_string(),
                phone_number: a[2].to_string(),
                email: a[3].to_string(),
                address: a[4].to_string(),
                sex: a[5].to_string(),
                birthday: a[6].to_string(),
                country: a[7].to_string(),
            };
            s.update_user_info(c, a[0], &update).map(|_| None)
        }
        UpdateUserAvatar => s.update_user_avatar(c, a[0]).map(|_| None),

        AddSubjectToCourse => s.add_subject_to_course(c, a[0], a[1]).map(|_| None),
        RemoveSubjectFromCourse => s.remove_subject_from_course(c, a[0], a[1]).map(|_| None),
        AddClassToTeacher => s.add_class_to_teacher(c, a[0], a[1]).map(|_| None),
        DeleteClass => s.delete_class(c, a[0]).map(|_| None),
        DeleteCourse => s.delete_course(c, a[0]).map(|_| None),
        DeleteSubject => s.delete_subject(c, a[0]).map(|_| None),

        StudentRegisterClass => s.register_student_in_class(c, a[0], a[1]).map(|_| None),
        StudentCancelRegisterClass => s
            .cancel_student_class_registration(c, a[0], a[1])
            .map(|_| None),
        StudentRegisterCourse => s.register_student_in_course(c, a[0], a[1]).map(|_| None),
        CloseRegisterClass => s.close_register_class(c, a[0]).map(|_| None),

        CreateScore => s.create_score(c, a[0], a[1], a[2], a[3]).map(|_| None),
        CreateCertificate => s
            .create_certificate(c, a[0], a[1], a[2], a[3])
            .map(|_| None),

        GetCourse => json(&s.get_course(c, a[0])?),
        GetSubject => json(&s.get_subject(c, a[0])?),
        GetClass => json(&s.get_class(c, a[0])?),
        GetStudent => json(&s.get_student(c, a[0])?),
        GetTeacher => json(&s.get_teacher(c, a[0])?),
        GetCertificate => json(&s.get_certificate(c, a[0])?),
        GetAllCourses => json(&s.get_all_courses(c)?),
        GetAllSubjects => json(&s.get_all_subjects(c)?),
        GetAllClasses => json(&s.get_all_classes(c)?),
        GetAllStudents => json(&s.get_all_students(c)?),
        GetAllTeachers => json(&s.get_all_teachers(c)?),
        GetAllScores => json(&s.get_all_scores(c)?),
        GetAllCertificates => json(&s.get_all_certificates(c)?),
        GetSubjectsOfCourse => json(&s.get_subjects_of_course(c, a[0])?),
        GetStudentsOfCourse => json(&s.get_students_of_course(c, a[0])?),
        GetClassesOfSubject => json(&s.get_classes_of_subject(c, a[0])?),
        GetStudentsOfClass => json(&s.get_students_of_class(c, a[0])?),
        GetClassesOfStudent => json(&s.get_classes_of_student(c, a[0])?),
        GetCoursesOfStudent => json(&s.get_courses_of_student(c, a[0])?),
        GetCertificatesOfStudent => json(&s.get_certificates_of_student(c, a[0])?),
        GetScoresByStudent => json(&s.get_scores_by_student(c, a[0])?),
        GetClassesByTeacher => json(&s.get_classes_by_teacher(c, a[0])?),
    }
}
