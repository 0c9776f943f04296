use serde::{Deserialize, Serialize};

use crate::models::{ApplicationStatus, Course, NewCourseRequest, NewStudentRequest, Student};

/// Request-scoped view of one student with every course and its status.
/// Rebuilt from storage on every read, decomposed back to rows on writes;
/// it owns nothing persistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDetail {
    pub student: Student,
    pub courses: Vec<CourseDetail>,
}

/// One course paired with its status, `None` when no status row exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetail {
    pub course: Course,
    pub application_status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterStudentRequest {
    pub student: NewStudentRequest,
    pub courses: Vec<NewCourseRequest>,
}
