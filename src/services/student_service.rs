use chrono::{Months, Utc};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::aggregate;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    ApplicationStatus, Course, CourseDetail, NewStatusRequest, RegisterStudentRequest, Student,
    StudentDetail, UpdateStatusRequest,
};

/// Status label seeded onto every course at registration.
const INITIAL_STATUS: &str = "provisional";
/// Actor recorded on system-generated status rows.
const SYSTEM_ACTOR: &str = "system";
const INITIAL_NOTES: &str = "Scheduled to attend the initial orientation session";

/// Use cases over the nested student/course/application-status graph.
///
/// Reads assemble the view from flat rows; writes decompose it back into
/// per-table calls, cascading parent-generated ids downward inside one
/// transaction.
pub struct StudentService {
    db: SqlitePool,
}

impl StudentService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Full detail listing. The student scan leaves out soft-deleted rows;
    /// course and status scans are unfiltered.
    pub async fn search_student_list(&self) -> Result<Vec<StudentDetail>, AppError> {
        let students = repository::fetch_students(&self.db).await?;
        let courses = repository::fetch_courses(&self.db).await?;
        let statuses = repository::fetch_statuses(&self.db).await?;
        Ok(aggregate::assemble(students, courses, statuses))
    }

    /// Detail for one student. `None` when the id matches nothing; the
    /// boundary decides what absence means.
    pub async fn search_student(&self, id: i64) -> Result<Option<StudentDetail>, AppError> {
        let Some(student) = repository::find_student_by_id(&self.db, id).await? else {
            return Ok(None);
        };

        let courses = repository::fetch_courses_by_student(&self.db, id).await?;

        let mut statuses = Vec::with_capacity(courses.len());
        for course in &courses {
            if let Some(status) = repository::find_status_by_course(&self.db, course.id).await? {
                statuses.push(status);
            }
        }

        Ok(aggregate::assemble(vec![student], courses, statuses)
            .into_iter()
            .next())
    }

    pub async fn search_students_by_name(&self, name: &str) -> Result<Vec<Student>, AppError> {
        Ok(repository::search_students_by_name(&self.db, name).await?)
    }

    pub async fn search_students_by_email(&self, email: &str) -> Result<Vec<Student>, AppError> {
        Ok(repository::search_students_by_email(&self.db, email).await?)
    }

    pub async fn search_students_by_area(&self, area: &str) -> Result<Vec<Student>, AppError> {
        Ok(repository::search_students_by_area(&self.db, area).await?)
    }

    pub async fn search_students_by_age(&self, age: i32) -> Result<Vec<Student>, AppError> {
        Ok(repository::search_students_by_age(&self.db, age).await?)
    }

    pub async fn search_students_by_sex(&self, sex: &str) -> Result<Vec<Student>, AppError> {
        Ok(repository::search_students_by_sex(&self.db, sex).await?)
    }

    pub async fn search_course_list(&self) -> Result<Vec<Course>, AppError> {
        Ok(repository::fetch_courses(&self.db).await?)
    }

    /// Registers a student with its courses, seeding an application status
    /// per course. All inserts share one transaction; the student row goes
    /// first so its generated id can flow into the course rows, and each
    /// course id flows into its status row. Returns a freshly built graph
    /// carrying every generated id and timestamp.
    pub async fn register_student(
        &self,
        req: RegisterStudentRequest,
    ) -> Result<StudentDetail, AppError> {
        let mut tx = self.db.begin().await?;
        let now = Utc::now();

        let student = repository::insert_student(&mut *tx, req.student).await?;

        let mut courses = Vec::with_capacity(req.courses.len());
        for new_course in req.courses {
            // The enrollment window is system-assigned: starts now, runs a
            // year. Caller-supplied dates are not consulted.
            let course = repository::insert_course(
                &mut *tx,
                student.id,
                new_course.course_name,
                now,
                now + Months::new(12),
            )
            .await?;

            let status = repository::insert_status(
                &mut *tx,
                NewStatusRequest {
                    course_id: course.id,
                    application_status: INITIAL_STATUS.to_string(),
                    created_at: now,
                    last_updated_at: now,
                    last_updated_by: SYSTEM_ACTOR.to_string(),
                    notes: Some(INITIAL_NOTES.to_string()),
                },
            )
            .await?;

            courses.push(CourseDetail {
                course,
                application_status: Some(status),
            });
        }

        tx.commit().await?;
        info!("registered student {} with {} course(s)", student.id, courses.len());

        Ok(StudentDetail { student, courses })
    }

    /// Updates a whole detail graph: the student row in full (including the
    /// deletion flag), then each course's mutable fields, then label, actor
    /// and notes of each paired status. Ids that match nothing update zero
    /// rows and stay silent; everything still commits or rolls back as one.
    pub async fn update_student(&self, detail: StudentDetail) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;

        let affected = repository::update_student(&mut *tx, &detail.student).await?;
        if affected == 0 {
            warn!("update for student {} matched no row", detail.student.id);
        }

        for course_detail in &detail.courses {
            let affected = repository::update_course(&mut *tx, &course_detail.course).await?;
            if affected == 0 {
                warn!("update for course {} matched no row", course_detail.course.id);
            }

            if let Some(status) = &course_detail.application_status {
                let update = UpdateStatusRequest {
                    application_status: status.application_status.clone(),
                    last_updated_by: status.last_updated_by.clone(),
                    notes: status.notes.clone(),
                };
                repository::update_status_by_course(&mut *tx, course_detail.course.id, &update)
                    .await?;
            }
        }

        tx.commit().await?;
        info!("updated student {}", detail.student.id);
        Ok(())
    }

    /// Logical delete: flips the flag, keeps the row. Safe to repeat and
    /// safe to call on ids that do not exist.
    pub async fn delete_student(&self, id: i64) -> Result<(), AppError> {
        let affected = repository::delete_student(&self.db, id).await?;
        if affected == 0 {
            warn!("delete for student {} matched no row", id);
        }
        Ok(())
    }

    pub async fn restore_student(&self, id: i64) -> Result<(), AppError> {
        let affected = repository::restore_student(&self.db, id).await?;
        if affected == 0 {
            warn!("restore for student {} matched no row", id);
        }
        Ok(())
    }

    pub async fn search_status_list(&self) -> Result<Vec<ApplicationStatus>, AppError> {
        Ok(repository::fetch_statuses(&self.db).await?)
    }

    pub async fn search_status(
        &self,
        course_id: i64,
    ) -> Result<Option<ApplicationStatus>, AppError> {
        Ok(repository::find_status_by_course(&self.db, course_id).await?)
    }

    pub async fn register_status(
        &self,
        req: NewStatusRequest,
    ) -> Result<ApplicationStatus, AppError> {
        Ok(repository::insert_status(&self.db, req).await?)
    }

    pub async fn update_status(
        &self,
        course_id: i64,
        req: UpdateStatusRequest,
    ) -> Result<(), AppError> {
        let affected = repository::update_status_by_course(&self.db, course_id, &req).await?;
        if affected == 0 {
            warn!("status update for course {} matched no row", course_id);
        }
        Ok(())
    }

    pub async fn delete_status(&self, id: i64) -> Result<(), AppError> {
        let affected = repository::delete_status(&self.db, id).await?;
        if affected == 0 {
            warn!("delete for status {} matched no row", id);
        }
        Ok(())
    }

    pub async fn restore_status(&self, id: i64) -> Result<(), AppError> {
        let affected = repository::restore_status(&self.db, id).await?;
        if affected == 0 {
            warn!("restore for status {} matched no row", id);
        }
        Ok(())
    }
}
