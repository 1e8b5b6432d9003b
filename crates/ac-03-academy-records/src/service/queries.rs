//! # Query Layer
//!
//! Read-only projections. Relationship queries follow id lists; a dangling id
//! fails `NotFound`. `*_by_*` queries scan a whole kind.

use ac_01_record_store::KeyValueStore;
use ac_02_identity_gate::{Caller, Role};

use super::AcademyService;
use crate::domain::entities::{Certificate, Class, Course, Score, Student, Subject, Teacher};
use crate::domain::errors::AcademyError;
use crate::domain::keys::EntityKey;

impl<S: KeyValueStore> AcademyService<S> {
    pub fn get_course(&self, _caller: &Caller, id: &str) -> Result<Course, AcademyError> {
        self.read("GetCourse", |repo| repo.course(id))
    }

    pub fn get_subject(&self, _caller: &Caller, id: &str) -> Result<Subject, AcademyError> {
        self.read("GetSubject", |repo| repo.subject(id))
    }

    pub fn get_class(&self, _caller: &Caller, id: &str) -> Result<Class, AcademyError> {
        self.read("GetClass", |repo| repo.class(id))
    }

    pub fn get_student(&self, _caller: &Caller, username: &str) -> Result<Student, AcademyError> {
        self.read("GetStudent", |repo| repo.student(username))
    }

    pub fn get_teacher(&self, caller: &Caller, username: &str) -> Result<Teacher, AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.read("GetTeacher", |repo| repo.teacher(username))
    }

    pub fn get_certificate(&self, _caller: &Caller, id: &str) -> Result<Certificate, AcademyError> {
        self.read("GetCertificate", |repo| repo.certificate(id))
    }

    pub fn get_all_courses(&self, _caller: &Caller) -> Result<Vec<Course>, AcademyError> {
        self.read("GetAllCourses", |repo| repo.scan())
    }

    pub fn get_all_subjects(&self, _caller: &Caller) -> Result<Vec<Subject>, AcademyError> {
        self.read("GetAllSubjects", |repo| repo.scan())
    }

    pub fn get_all_classes(&self, _caller: &Caller) -> Result<Vec<Class>, AcademyError> {
        self.read("GetAllClasses", |repo| repo.scan())
    }

    pub fn get_all_students(&self, _caller: &Caller) -> Result<Vec<Student>, AcademyError> {
        self.read("GetAllStudents", |repo| repo.scan())
    }

    pub fn get_all_teachers(&self, _caller: &Caller) -> Result<Vec<Teacher>, AcademyError> {
        self.read("GetAllTeachers", |repo| repo.scan())
    }

    pub fn get_all_scores(&self, caller: &Caller) -> Result<Vec<Score>, AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.read("GetAllScores", |repo| repo.scan())
    }

    pub fn get_all_certificates(&self, caller: &Caller) -> Result<Vec<Certificate>, AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.read("GetAllCertificates", |repo| repo.scan())
    }

    pub fn get_subjects_of_course(&self, _caller: &Caller, course_id: &str) -> Result<Vec<Subject>, AcademyError> {
        self.read("GetSubjectsOfCourse", |repo| {
            let course = repo.course(course_id)?;
            repo.load_all(&course.subject_ids, EntityKey::subject)
        })
    }

    pub fn get_students_of_course(&self, caller: &Caller, course_id: &str) -> Result<Vec<Student>, AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.read("GetStudentsOfCourse", |repo| {
            let course = repo.course(course_id)?;
            repo.load_all(&course.student_ids, EntityKey::student)
        })
    }

    pub fn get_classes_of_subject(&self, _caller: &Caller, subject_id: &str) -> Result<Vec<Class>, AcademyError> {
        self.read("GetClassesOfSubject", |repo| {
            let subject = repo.subject(subject_id)?;
            repo.load_all(&subject.class_ids, EntityKey::class)
        })
    }

    /// Closed to the learner organisation.
    pub fn get_students_of_class(&self, caller: &Caller, class_id: &str) -> Result<Vec<Student>, AcademyError> {
        self.gate(self.policy.deny_org(caller, Role::Learner))?;
        self.read("GetStudentsOfClass", |repo| {
            let class = repo.class(class_id)?;
            repo.load_all(&class.student_ids, EntityKey::student)
        })
    }

    pub fn get_classes_of_student(&self, _caller: &Caller, username: &str) -> Result<Vec<Class>, AcademyError> {
        self.read("GetClassesOfStudent", |repo| {
            let student = repo.student(username)?;
            repo.load_all(&student.class_ids, EntityKey::class)
        })
    }

    pub fn get_courses_of_student(&self, _caller: &Caller, username: &str) -> Result<Vec<Course>, AcademyError> {
        self.read("GetCoursesOfStudent", |repo| {
            let student = repo.student(username)?;
            repo.load_all(&student.course_ids, EntityKey::course)
        })
    }

    pub fn get_certificates_of_student(
        &self,
        _caller: &Caller,
        username: &str,
    ) -> Result<Vec<Certificate>, AcademyError> {
        self.read("GetCertificatesOfStudent", |repo| {
            let student = repo.student(username)?;
            repo.load_all(&student.certificate_ids, EntityKey::certificate)
        })
    }

    /// Fails `NotFound` for an unknown student rather than returning an
    /// empty list.
    pub fn get_scores_by_student(&self, _caller: &Caller, username: &str) -> Result<Vec<Score>, AcademyError> {
        self.read("GetScoresByStudent", |repo| {
            repo.student(username)?;
            let scores: Vec<Score> = repo.scan()?;
            Ok(scores
                .into_iter()
                .filter(|s| s.student_username == username)
                .collect())
        })
    }

    pub fn get_classes_by_teacher(&self, caller: &Caller, username: &str) -> Result<Vec<Class>, AcademyError> {
        self.gate(self.policy.require_org(caller, Role::Academy))?;
        self.read("GetClassesByTeacher", |repo| {
            let classes: Vec<Class> = repo.scan()?;
            Ok(classes
                .into_iter()
                .filter(|c| c.teacher_username.as_deref() == Some(username))
                .collect())
        })
    }
}
