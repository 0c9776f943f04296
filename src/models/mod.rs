pub mod course;
pub mod detail;
pub mod status;
pub mod student;

pub use course::{Course, NewCourseRequest};
pub use detail::{CourseDetail, RegisterStudentRequest, StudentDetail};
pub use status::{ApplicationStatus, NewStatusRequest, UpdateStatusRequest};
pub use student::{NewStudentRequest, Student};
