#![allow(dead_code)]

use ac_01_record_store::InMemoryKVStore;
use ac_02_identity_gate::Caller;
use ac_03_academy_records::{AcademyService, ClassDetails, ClassStatus, Repository, ServiceConfig};

pub type Service = AcademyService<InMemoryKVStore>;

pub fn service() -> Service {
    AcademyService::new(InMemoryKVStore::new(), ServiceConfig::default())
}

pub fn admin() -> Caller {
    Caller::with_attribute("AcademyMSP", "admin")
}

pub fn teacher(username: &str) -> Caller {
    Caller::with_attribute("AcademyMSP", username)
}

pub fn learner(username: &str) -> Caller {
    Caller::with_attribute("StudentMSP", username)
}

pub fn details(code: &str) -> ClassDetails {
    ClassDetails {
        code: code.to_string(),
        room: "A101".to_string(),
        time: "Mon 08:00".to_string(),
        start_date: "2024-01-08".to_string(),
        end_date: "2024-03-29".to_string(),
        repeat: "weekly".to_string(),
    }
}

pub fn subject(svc: &Service, id: &str) {
    svc.create_subject(&admin(), id, &format!("{id}-code"), id, "", "").unwrap();
}

pub fn course(svc: &Service, id: &str, subjects: &[&str]) {
    svc.create_course(&admin(), id, &format!("{id}-code"), id, "", "").unwrap();
    for s in subjects {
        svc.add_subject_to_course(&admin(), id, s).unwrap();
    }
}

pub fn class(svc: &Service, id: &str, subject_id: &str, capacity: u64) {
    svc.create_class(&admin(), id, &details(id), subject_id, &capacity.to_string())
        .unwrap();
}

pub fn student(svc: &Service, username: &str) {
    svc.create_student(&admin(), username, &format!("Student {username}")).unwrap();
}

pub fn staff(svc: &Service, username: &str) {
    svc.create_teacher(&admin(), username, &format!("Teacher {username}")).unwrap();
}

/// Force a class status. No operation moves a class into `InProgress`, so
/// score tests write it directly.
pub fn set_status(svc: Service, class_id: &str, status: ClassStatus) -> Service {
    let config = svc.config().clone();
    let mut store = svc.into_store();
    let uow = {
        let repo = Repository::new(&store, config.codec);
        let mut class = repo.class(class_id).unwrap();
        class.status = status;
        let mut uow = repo.unit_of_work();
        uow.put(&class).unwrap();
        uow
    };
    uow.commit(&mut store).unwrap();
    AcademyService::new(store, config)
}

/// Every record, as the queries see them.
pub fn snapshot(svc: &Service) -> serde_json::Value {
    let a = admin();
    serde_json::json!({
        "courses": svc.get_all_courses(&a).unwrap(),
        "subjects": svc.get_all_subjects(&a).unwrap(),
        "classes": svc.get_all_classes(&a).unwrap(),
        "students": svc.get_all_students(&a).unwrap(),
        "teachers": svc.get_all_teachers(&a).unwrap(),
        "scores": svc.get_all_scores(&a).unwrap(),
        "certificates": svc.get_all_certificates(&a).unwrap(),
    })
}
