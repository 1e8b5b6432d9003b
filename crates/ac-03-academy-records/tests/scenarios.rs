//! End-to-end scenarios against the in-memory store.

mod common;

use ac_02_identity_gate::Caller;
use ac_03_academy_records::{AcademyError, ClassStatus, EntityKind, ErrorKind, ProfileUpdate};
use common::*;

fn certificate_fixture(score_second_subject: bool) -> Service {
    let svc = service();
    subject(&svc, "S1");
    subject(&svc, "S2");
    course(&svc, "C1", &["S1", "S2"]);
    student(&svc, "U1");
    staff(&svc, "T1");
    class(&svc, "CL1", "S1", 5);
    class(&svc, "CL2", "S2", 5);
    svc.add_class_to_teacher(&admin(), "CL1", "T1").unwrap();
    svc.add_class_to_teacher(&admin(), "CL2", "T1").unwrap();

    let u1 = learner("U1");
    svc.register_student_in_course(&u1, "U1", "C1").unwrap();
    svc.register_student_in_class(&u1, "U1", "CL1").unwrap();
    svc.register_student_in_class(&u1, "U1", "CL2").unwrap();

    let svc = set_status(svc, "CL1", ClassStatus::InProgress);
    let svc = set_status(svc, "CL2", ClassStatus::InProgress);
    svc.create_score(&teacher("T1"), "T1", "CL1", "U1", "8.5").unwrap();
    if score_second_subject {
        svc.create_score(&teacher("T1"), "T1", "CL2", "U1", "7").unwrap();
    }
    svc
}

#[test]
fn test_certificate_issued_when_every_subject_scored() {
    let svc = certificate_fixture(true);
    svc.create_certificate(&learner("U1"), "Cert1", "C1", "U1", "2024-01-01")
        .unwrap();

    let u1 = svc.get_student(&admin(), "U1").unwrap();
    assert_eq!(u1.certificate_ids.as_slice(), ["Cert1"]);
    let cert = svc.get_certificate(&admin(), "Cert1").unwrap();
    assert_eq!(cert.course_id, "C1");
    assert_eq!(cert.student_username, "U1");
}

#[test]
fn test_certificate_refused_with_missing_score() {
    let svc = certificate_fixture(false);
    let before = snapshot(&svc);

    let err = svc
        .create_certificate(&learner("U1"), "Cert1", "C1", "U1", "2024-01-01")
        .unwrap_err();
    match err {
        AcademyError::IncompleteSubjects { missing, .. } => assert_eq!(missing, ["S2"]),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(snapshot(&svc), before);
    assert!(svc.get_all_certificates(&admin()).unwrap().is_empty());
}

#[test]
fn test_certificate_checks_run_in_order() {
    let svc = certificate_fixture(true);
    let u1 = learner("U1");
    svc.create_certificate(&u1, "Cert1", "C1", "U1", "2024-01-01").unwrap();

    // Same id again.
    let err = svc.create_certificate(&u1, "Cert1", "C1", "U1", "2024-01-02").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    // New id, same course.
    let err = svc.create_certificate(&u1, "Cert2", "C1", "U1", "2024-01-02").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyIssued);

    // Unknown course.
    let err = svc.create_certificate(&u1, "Cert3", "C9", "U1", "2024-01-02").unwrap_err();
    assert_eq!(err, AcademyError::not_found(EntityKind::Course, "C9"));
}

#[test]
fn test_certificate_requires_course_enrollment() {
    let svc = service();
    subject(&svc, "S1");
    course(&svc, "C1", &["S1"]);
    student(&svc, "U1");

    let err = svc
        .create_certificate(&learner("U1"), "Cert1", "C1", "U1", "2024-01-01")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEnrolled);
}

#[test]
fn test_certificate_for_course_without_subjects_needs_only_enrollment() {
    let svc = service();
    course(&svc, "C1", &[]);
    student(&svc, "U1");
    svc.register_student_in_course(&learner("U1"), "U1", "C1").unwrap();
    svc.create_certificate(&learner("U1"), "Cert1", "C1", "U1", "2024-01-01")
        .unwrap();
}

#[test]
fn test_second_registration_in_full_class_is_refused() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 1);
    student(&svc, "U1");
    student(&svc, "U2");

    svc.register_student_in_class(&learner("U1"), "U1", "CL1").unwrap();
    let err = svc
        .register_student_in_class(&learner("U2"), "U2", "CL1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClassFull);
    assert_eq!(svc.get_class(&admin(), "CL1").unwrap().student_ids.as_slice(), ["U1"]);
}

#[test]
fn test_second_class_of_same_subject_is_refused() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    class(&svc, "CL2", "S1", 10);
    student(&svc, "U1");

    svc.register_student_in_class(&learner("U1"), "U1", "CL1").unwrap();
    let err = svc
        .register_student_in_class(&learner("U1"), "U1", "CL2")
        .unwrap_err();
    assert_eq!(
        err,
        AcademyError::DuplicateSubject {
            student: "U1".into(),
            subject_id: "S1".into(),
            existing_class: "CL1".into(),
        }
    );

    let err = svc
        .register_student_in_class(&learner("U1"), "U1", "CL1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);
}

#[test]
fn test_subject_with_classes_cannot_be_deleted() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);

    let err = svc.delete_subject(&admin(), "S1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEmpty);

    svc.delete_class(&admin(), "CL1").unwrap();
    svc.delete_subject(&admin(), "S1").unwrap();
    assert_eq!(svc.get_subject(&admin(), "S1").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_class_cleans_every_back_reference() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    class(&svc, "CL2", "S1", 10);
    staff(&svc, "T1");
    svc.add_class_to_teacher(&admin(), "CL1", "T1").unwrap();
    svc.add_class_to_teacher(&admin(), "CL2", "T1").unwrap();
    for u in ["U1", "U2", "U3"] {
        student(&svc, u);
        svc.register_student_in_class(&learner(u), u, "CL1").unwrap();
    }

    svc.delete_class(&admin(), "CL1").unwrap();

    for u in ["U1", "U2", "U3"] {
        assert!(svc.get_student(&admin(), u).unwrap().class_ids.is_empty());
    }
    assert_eq!(svc.get_subject(&admin(), "S1").unwrap().class_ids.as_slice(), ["CL2"]);
    assert_eq!(svc.get_teacher(&admin(), "T1").unwrap().class_ids.as_slice(), ["CL2"]);
    assert_eq!(svc.get_class(&admin(), "CL1").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_class_requires_open_status() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    svc.close_register_class(&admin(), "CL1").unwrap();

    let before = snapshot(&svc);
    let err = svc.delete_class(&admin(), "CL1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(snapshot(&svc), before);
}

#[test]
fn test_delete_course_unlinks_students() {
    let svc = service();
    course(&svc, "C1", &[]);
    course(&svc, "C2", &[]);
    student(&svc, "U1");
    svc.register_student_in_course(&learner("U1"), "U1", "C1").unwrap();
    svc.register_student_in_course(&learner("U1"), "U1", "C2").unwrap();

    svc.delete_course(&admin(), "C1").unwrap();
    assert_eq!(svc.get_student(&admin(), "U1").unwrap().course_ids.as_slice(), ["C2"]);
    assert_eq!(svc.get_all_courses(&admin()).unwrap().len(), 1);
}

#[test]
fn test_delete_subject_unlinks_courses() {
    let svc = service();
    subject(&svc, "S1");
    subject(&svc, "S2");
    course(&svc, "C1", &["S1", "S2"]);

    svc.delete_subject(&admin(), "S1").unwrap();
    assert_eq!(
        svc.get_course(&admin(), "C1").unwrap().subject_ids.as_slice(),
        ["S2"]
    );
}

#[test]
fn test_closed_class_blocks_registration_and_cancellation() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    student(&svc, "U1");
    student(&svc, "U2");
    svc.register_student_in_class(&learner("U1"), "U1", "CL1").unwrap();
    svc.close_register_class(&admin(), "CL1").unwrap();

    let err = svc.register_student_in_class(&learner("U2"), "U2", "CL1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = svc
        .cancel_student_class_registration(&learner("U1"), "U1", "CL1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = svc.close_register_class(&admin(), "CL1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_cancel_removes_both_sides() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    student(&svc, "U1");
    svc.register_student_in_class(&learner("U1"), "U1", "CL1").unwrap();

    svc.cancel_student_class_registration(&learner("U1"), "U1", "CL1")
        .unwrap();
    assert!(svc.get_student(&admin(), "U1").unwrap().class_ids.is_empty());
    assert!(svc.get_class(&admin(), "CL1").unwrap().student_ids.is_empty());

    let err = svc
        .cancel_student_class_registration(&learner("U1"), "U1", "CL1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotRegistered);
}

#[test]
fn test_add_subject_twice_is_already_linked() {
    let svc = service();
    subject(&svc, "S1");
    course(&svc, "C1", &["S1"]);
    let err = svc.add_subject_to_course(&admin(), "C1", "S1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyLinked);

    let err = svc.add_subject_to_course(&admin(), "C1", "S9").unwrap_err();
    assert_eq!(err, AcademyError::not_found(EntityKind::Subject, "S9"));
}

#[test]
fn test_remove_absent_subject_is_a_no_op() {
    let svc = service();
    subject(&svc, "S1");
    subject(&svc, "S2");
    course(&svc, "C1", &["S1", "S2"]);

    let before = svc.stats().records_written;
    svc.remove_subject_from_course(&admin(), "C1", "S3").unwrap();
    assert_eq!(svc.stats().records_written, before);
    assert_eq!(
        svc.get_course(&admin(), "C1").unwrap().subject_ids.as_slice(),
        ["S1", "S2"]
    );

    svc.remove_subject_from_course(&admin(), "C1", "S1").unwrap();
    assert_eq!(
        svc.get_course(&admin(), "C1").unwrap().subject_ids.as_slice(),
        ["S2"]
    );
}

#[test]
fn test_assigning_the_same_class_twice_is_already_linked() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    staff(&svc, "T1");
    svc.add_class_to_teacher(&admin(), "CL1", "T1").unwrap();
    let err = svc.add_class_to_teacher(&admin(), "CL1", "T1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyLinked);
}

#[test]
fn test_score_entry_requires_in_progress_class() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    staff(&svc, "T1");
    student(&svc, "U1");
    svc.add_class_to_teacher(&admin(), "CL1", "T1").unwrap();
    svc.register_student_in_class(&learner("U1"), "U1", "CL1").unwrap();

    let err = svc.create_score(&teacher("T1"), "T1", "CL1", "U1", "9").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let svc = set_status(svc, "CL1", ClassStatus::InProgress);
    svc.create_score(&teacher("T1"), "T1", "CL1", "U1", "9").unwrap();
    let err = svc.create_score(&teacher("T1"), "T1", "CL1", "U1", "10").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let scores = svc.get_scores_by_student(&admin(), "U1").unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].value, 9.0);
}

#[test]
fn test_score_entry_is_limited_to_the_assigned_teacher() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    staff(&svc, "T1");
    staff(&svc, "T2");
    student(&svc, "U1");
    svc.add_class_to_teacher(&admin(), "CL1", "T1").unwrap();
    svc.register_student_in_class(&learner("U1"), "U1", "CL1").unwrap();
    let svc = set_status(svc, "CL1", ClassStatus::InProgress);

    // T2 acting as T1.
    let err = svc.create_score(&teacher("T2"), "T1", "CL1", "U1", "9").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    // T2 as itself, but not the class teacher.
    let err = svc.create_score(&teacher("T2"), "T2", "CL1", "U1", "9").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    let err = svc.create_score(&teacher("T1"), "T1", "CL1", "U1", "high").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_gate_denials_change_nothing() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    student(&svc, "U1");
    student(&svc, "U2");
    let before = snapshot(&svc);

    let denied = [
        svc.create_course(&learner("U1"), "C1", "", "", "", ""),
        svc.register_student_in_class(&learner("U2"), "U1", "CL1"),
        svc.register_student_in_class(&admin(), "U1", "CL1"),
        svc.delete_class(&learner("U1"), "CL1"),
        svc.close_register_class(&learner("U1"), "CL1"),
        svc.create_student(&learner("U3"), "U4", "Someone Else"),
    ];
    for result in denied {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::PermissionDenied);
    }
    assert_eq!(snapshot(&svc), before);
    assert_eq!(svc.stats().requests_denied, 6);

    assert_eq!(
        svc.get_students_of_class(&learner("U1"), "CL1").unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
}

#[test]
fn test_learner_may_create_own_record() {
    let svc = service();
    svc.create_student(&learner("U1"), "U1", "Self Made").unwrap();
    let err = svc.create_student(&admin(), "U1", "Dup").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn test_class_creation_links_subject_and_validates_capacity() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 3);
    assert_eq!(svc.get_subject(&admin(), "S1").unwrap().class_ids.as_slice(), ["CL1"]);
    assert_eq!(svc.get_class(&admin(), "CL1").unwrap().status, ClassStatus::Open);

    let err = svc
        .create_class(&admin(), "CL2", &details("X"), "S1", "many")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = svc
        .create_class(&admin(), "CL2", &details("X"), "S9", "3")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = svc
        .create_class(&admin(), "CL1", &details("X"), "S1", "3")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn test_capacity_cannot_shrink_below_enrollment() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 3);
    student(&svc, "U1");
    student(&svc, "U2");
    svc.register_student_in_class(&learner("U1"), "U1", "CL1").unwrap();
    svc.register_student_in_class(&learner("U2"), "U2", "CL1").unwrap();

    let err = svc
        .update_class_info(&admin(), "CL1", &Default::default(), "1")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    svc.update_class_info(&admin(), "CL1", &details("NEW"), "2").unwrap();
    let cl = svc.get_class(&admin(), "CL1").unwrap();
    assert_eq!(cl.capacity, 2);
    assert_eq!(cl.code, "NEW");

    svc.update_class_info(&admin(), "CL1", &Default::default(), "").unwrap();
    let cl = svc.get_class(&admin(), "CL1").unwrap();
    assert_eq!(cl.capacity, 2);
    assert_eq!(cl.room, "A101");
}

#[test]
fn test_scores_of_unknown_student_is_not_found() {
    let svc = service();
    let err = svc.get_scores_by_student(&admin(), "U9").unwrap_err();
    assert_eq!(err, AcademyError::not_found(EntityKind::Student, "U9"));

    student(&svc, "U1");
    assert!(svc.get_scores_by_student(&admin(), "U1").unwrap().is_empty());
}

#[test]
fn test_second_course_registration_is_already_registered() {
    let svc = service();
    course(&svc, "C1", &[]);
    student(&svc, "U1");
    let u1 = learner("U1");
    svc.register_student_in_course(&u1, "U1", "C1").unwrap();

    let before = snapshot(&svc);
    let err = svc.register_student_in_course(&u1, "U1", "C1").unwrap_err();
    assert_eq!(
        err,
        AcademyError::AlreadyRegistered {
            student: "U1".into(),
            kind: EntityKind::Course,
            id: "C1".into(),
        }
    );
    assert_eq!(snapshot(&svc), before);
    assert_eq!(svc.get_course(&admin(), "C1").unwrap().student_ids.as_slice(), ["U1"]);
}

#[test]
fn test_registration_against_missing_records_is_not_found() {
    let svc = service();
    subject(&svc, "S1");
    class(&svc, "CL1", "S1", 10);
    course(&svc, "C1", &[]);
    student(&svc, "U1");
    let before = snapshot(&svc);

    // Student U2 was never created.
    let u2 = learner("U2");
    assert_eq!(
        svc.register_student_in_class(&u2, "U2", "CL1").unwrap_err(),
        AcademyError::not_found(EntityKind::Student, "U2")
    );
    assert_eq!(
        svc.register_student_in_course(&u2, "U2", "C1").unwrap_err(),
        AcademyError::not_found(EntityKind::Student, "U2")
    );
    assert_eq!(
        svc.cancel_student_class_registration(&u2, "U2", "CL1").unwrap_err(),
        AcademyError::not_found(EntityKind::Student, "U2")
    );

    let u1 = learner("U1");
    assert_eq!(
        svc.register_student_in_class(&u1, "U1", "CL9").unwrap_err(),
        AcademyError::not_found(EntityKind::Class, "CL9")
    );
    assert_eq!(
        svc.register_student_in_course(&u1, "U1", "C9").unwrap_err(),
        AcademyError::not_found(EntityKind::Course, "C9")
    );
    assert_eq!(
        svc.cancel_student_class_registration(&u1, "U1", "CL9").unwrap_err(),
        AcademyError::not_found(EntityKind::Class, "CL9")
    );
    assert_eq!(
        svc.close_register_class(&admin(), "CL9").unwrap_err(),
        AcademyError::not_found(EntityKind::Class, "CL9")
    );

    assert_eq!(snapshot(&svc), before);
}

#[test]
fn test_learner_edits_only_own_profile() {
    let svc = service();
    student(&svc, "U1");
    student(&svc, "U2");

    let first = ProfileUpdate {
        fullname: "Ada L".into(),
        email: "ada@example.com".into(),
        phone_number: "555-0100".into(),
        ..ProfileUpdate::default()
    };
    svc.update_user_info(&learner("U1"), "U1", &first).unwrap();

    // Empty fields leave the stored values alone.
    let second = ProfileUpdate {
        country: "UK".into(),
        ..ProfileUpdate::default()
    };
    svc.update_user_info(&learner("U1"), "U1", &second).unwrap();

    let u1 = svc.get_student(&admin(), "U1").unwrap();
    assert_eq!(u1.fullname, "Ada L");
    assert_eq!(u1.contact_info.email, "ada@example.com");
    assert_eq!(u1.contact_info.phone_number, "555-0100");
    assert_eq!(u1.contact_info.country, "UK");

    let before = snapshot(&svc);
    let err = svc.update_user_info(&learner("U1"), "U2", &first).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(snapshot(&svc), before);
}

#[test]
fn test_academy_edits_teacher_profiles() {
    let svc = service();
    staff(&svc, "T1");
    student(&svc, "U1");

    let update = ProfileUpdate {
        fullname: "Dr. T".into(),
        address: "Room 4".into(),
        ..ProfileUpdate::default()
    };
    svc.update_user_info(&admin(), "T1", &update).unwrap();
    let t1 = svc.get_teacher(&admin(), "T1").unwrap();
    assert_eq!(t1.fullname, "Dr. T");
    assert_eq!(t1.contact_info.address, "Room 4");

    // The academy branch only reaches teacher records.
    let err = svc.update_user_info(&admin(), "U1", &update).unwrap_err();
    assert_eq!(err, AcademyError::not_found(EntityKind::Teacher, "U1"));
    assert_eq!(svc.get_student(&admin(), "U1").unwrap().fullname, "Student U1");

    let outsider = Caller::with_attribute("OtherMSP", "T1");
    let err = svc.update_user_info(&outsider, "T1", &update).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[test]
fn test_avatar_targets_the_callers_own_record() {
    let svc = service();
    student(&svc, "U1");
    staff(&svc, "T1");

    svc.update_user_avatar(&learner("U1"), "u1.png").unwrap();
    svc.update_user_avatar(&teacher("T1"), "t1.png").unwrap();
    assert_eq!(svc.get_student(&admin(), "U1").unwrap().contact_info.avatar, "u1.png");
    assert_eq!(svc.get_teacher(&admin(), "T1").unwrap().contact_info.avatar, "t1.png");

    svc.update_user_avatar(&learner("U1"), "").unwrap();
    assert_eq!(svc.get_student(&admin(), "U1").unwrap().contact_info.avatar, "u1.png");

    let before = snapshot(&svc);
    let anonymous = Caller::new("StudentMSP", None);
    let err = svc.update_user_avatar(&anonymous, "x.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    let outsider = Caller::with_attribute("OtherMSP", "U1");
    let err = svc.update_user_avatar(&outsider, "x.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(snapshot(&svc), before);

    let err = svc.update_user_avatar(&learner("U9"), "x.png").unwrap_err();
    assert_eq!(err, AcademyError::not_found(EntityKind::Student, "U9"));
}
