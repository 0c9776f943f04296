use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::patch;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::*;
use crate::services::StudentService;
use crate::state::AppState;

#[derive(Deserialize)]
struct StudentSearchParams {
    name: Option<String>,
    email: Option<String>,
    area: Option<String>,
    age: Option<i32>,
    sex: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/students",
            get(list_students).post(register_student).put(update_student),
        )
        .route("/students/search", get(search_students))
        .route("/students/{id}", get(get_student))
        .route("/students/{id}/delete", patch(delete_student))
        .route("/students/{id}/restore", patch(restore_student))
        .route("/courses", get(list_courses))
        .route("/courses/{id}/status", get(get_status).patch(update_status))
        .route("/statuses", get(list_statuses).post(register_status))
        .route("/statuses/{id}/delete", patch(delete_status))
        .route("/statuses/{id}/restore", patch(restore_status))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentDetail>>, AppError> {
    let service = StudentService::new(state.db.clone());
    Ok(Json(service.search_student_list().await?))
}

async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StudentDetail>, AppError> {
    let service = StudentService::new(state.db.clone());
    let detail = service.search_student(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(detail))
}

async fn search_students(
    State(state): State<AppState>,
    Query(params): Query<StudentSearchParams>,
) -> Result<Json<Vec<Student>>, AppError> {
    let service = StudentService::new(state.db.clone());
    let students = if let Some(name) = params.name {
        service.search_students_by_name(&name).await?
    } else if let Some(email) = params.email {
        service.search_students_by_email(&email).await?
    } else if let Some(area) = params.area {
        service.search_students_by_area(&area).await?
    } else if let Some(age) = params.age {
        service.search_students_by_age(age).await?
    } else if let Some(sex) = params.sex {
        service.search_students_by_sex(&sex).await?
    } else {
        return Err(AppError::BadRequest(
            "specify one of name, email, area, age or sex".to_string(),
        ));
    };
    Ok(Json(students))
}

async fn register_student(
    State(state): State<AppState>,
    Json(req): Json<RegisterStudentRequest>,
) -> Result<Json<StudentDetail>, AppError> {
    let service = StudentService::new(state.db.clone());
    Ok(Json(service.register_student(req).await?))
}

async fn update_student(
    State(state): State<AppState>,
    Json(detail): Json<StudentDetail>,
) -> Result<StatusCode, AppError> {
    let service = StudentService::new(state.db.clone());
    service.update_student(detail).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = StudentService::new(state.db.clone());
    service.delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn restore_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = StudentService::new(state.db.clone());
    service.restore_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let service = StudentService::new(state.db.clone());
    Ok(Json(service.search_course_list().await?))
}

async fn list_statuses(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationStatus>>, AppError> {
    let service = StudentService::new(state.db.clone());
    Ok(Json(service.search_status_list().await?))
}

async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApplicationStatus>, AppError> {
    let service = StudentService::new(state.db.clone());
    let status = service.search_status(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(status))
}

async fn register_status(
    State(state): State<AppState>,
    Json(req): Json<NewStatusRequest>,
) -> Result<Json<ApplicationStatus>, AppError> {
    let service = StudentService::new(state.db.clone());
    Ok(Json(service.register_status(req).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<StatusCode, AppError> {
    let service = StudentService::new(state.db.clone());
    service.update_status(id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = StudentService::new(state.db.clone());
    service.delete_status(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn restore_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = StudentService::new(state.db.clone());
    service.restore_status(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
