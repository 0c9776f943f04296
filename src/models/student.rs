use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub kana_name: String,
    pub nick_name: String,
    pub email: String,
    pub area: String,
    pub age: i32,
    pub sex: String,
    pub remark: Option<String>,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudentRequest {
    pub name: String,
    pub kana_name: String,
    pub nick_name: String,
    pub email: String,
    pub area: String,
    pub age: i32,
    pub sex: String,
    pub remark: Option<String>,
}
