//! # Inbound Port
//!
//! The callable surface: every operation by wire name, with the fixed number
//! of positional string arguments it takes.

use std::fmt;

macro_rules! operations {
    ($($variant:ident = $arity:expr),+ $(,)?) => {
        /// A callable operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($variant),+
        }

        impl Operation {
            /// Every operation, in declaration order.
            pub const ALL: &'static [Operation] = &[$(Operation::$variant),+];

            /// Wire name, e.g. `StudentRegisterClass`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Operation::$variant => stringify!($variant)),+
                }
            }

            /// Number of positional arguments.
            pub fn arity(self) -> usize {
                match self {
                    $(Operation::$variant => $arity),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Operation::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

operations! {
    // Catalog
    CreateStudent = 2,
    CreateTeacher = 2,
    CreateSubject = 5,
    CreateCourse = 5,
    CreateClass = 9,
    UpdateCourseInfo = 5,
    UpdateSubjectInfo = 5,
    UpdateClassInfo = 8,
    UpdateUserInfo = 8,
    UpdateUserAvatar = 1,

    // Relationships
    AddSubjectToCourse = 2,
    RemoveSubjectFromCourse = 2,
    AddClassToTeacher = 2,
    DeleteClass = 1,
    DeleteCourse = 1,
    DeleteSubject = 1,

    // Enrollment
    StudentRegisterClass = 2,
    StudentCancelRegisterClass = 2,
    StudentRegisterCourse = 2,
    CloseRegisterClass = 1,

    // Credentials
    CreateScore = 4,
    CreateCertificate = 4,

    // Queries
    GetCourse = 1,
    GetSubject = 1,
    GetClass = 1,
    GetStudent = 1,
    GetTeacher = 1,
    GetCertificate = 1,
    GetAllCourses = 0,
    GetAllSubjects = 0,
    GetAllClasses = 0,
    GetAllStudents = 0,
    GetAllTeachers = 0,
    GetAllScores = 0,
    GetAllCertificates = 0,
    GetSubjectsOfCourse = 1,
    GetStudentsOfCourse = 1,
    GetClassesOfSubject = 1,
    GetStudentsOfClass = 1,
    GetClassesOfStudent = 1,
    GetCoursesOfStudent = 1,
    GetCertificatesOfStudent = 1,
    GetScoresByStudent = 1,
    GetClassesByTeacher = 1,
}

impl Operation {
    /// Whether the operation only reads.
    pub fn is_query(self) -> bool {
        self.name().starts_with("Get")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
