use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An enrollment of a student in a named course with a start/end window.
/// `student_id` is set once at creation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub student_id: i64,
    pub course_name: String,
    pub course_start_at: DateTime<Utc>,
    pub course_end_at: DateTime<Utc>,
}

/// Course data accepted at registration time. The start/end window is
/// assigned by the service, so only the name is taken from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub course_name: String,
}
