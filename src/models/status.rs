use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Application lifecycle record attached to one course.
///
/// The label is an open set ("provisional", "confirmed", "in-progress",
/// "completed", "cancelled"); any non-blank string may overwrite any other,
/// there is no transition checking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationStatus {
    pub id: i64,
    pub course_id: i64,
    pub application_status: String,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub last_updated_by: String,
    pub notes: Option<String>,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStatusRequest {
    pub course_id: i64,
    pub application_status: String,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    pub last_updated_by: String,
    pub notes: Option<String>,
}

/// Fields an update may touch: label, actor and notes. Timestamps are left
/// alone on this path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub application_status: String,
    pub last_updated_by: String,
    pub notes: Option<String>,
}
