use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::models::{
    ApplicationStatus, Course, NewStatusRequest, NewStudentRequest, Student, UpdateStatusRequest,
};

// Every function takes any SQLite executor, so the same call runs against
// the pool directly or against `&mut *tx` inside an open transaction.

pub async fn fetch_students(db: impl SqliteExecutor<'_>) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, kana_name, nick_name, email, area, age, sex, remark, is_deleted \
         FROM students WHERE is_deleted = 0 ORDER BY id",
    )
    .fetch_all(db)
    .await
}

pub async fn find_student_by_id(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, kana_name, nick_name, email, area, age, sex, remark, is_deleted \
         FROM students WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn search_students_by_name(
    db: impl SqliteExecutor<'_>,
    name: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, kana_name, nick_name, email, area, age, sex, remark, is_deleted \
         FROM students WHERE name = ? AND is_deleted = 0 ORDER BY id",
    )
    .bind(name)
    .fetch_all(db)
    .await
}

pub async fn search_students_by_email(
    db: impl SqliteExecutor<'_>,
    email: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, kana_name, nick_name, email, area, age, sex, remark, is_deleted \
         FROM students WHERE email = ? AND is_deleted = 0 ORDER BY id",
    )
    .bind(email)
    .fetch_all(db)
    .await
}

pub async fn search_students_by_area(
    db: impl SqliteExecutor<'_>,
    area: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, kana_name, nick_name, email, area, age, sex, remark, is_deleted \
         FROM students WHERE area = ? AND is_deleted = 0 ORDER BY id",
    )
    .bind(area)
    .fetch_all(db)
    .await
}

pub async fn search_students_by_age(
    db: impl SqliteExecutor<'_>,
    age: i32,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, kana_name, nick_name, email, area, age, sex, remark, is_deleted \
         FROM students WHERE age = ? AND is_deleted = 0 ORDER BY id",
    )
    .bind(age)
    .fetch_all(db)
    .await
}

pub async fn search_students_by_sex(
    db: impl SqliteExecutor<'_>,
    sex: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, kana_name, nick_name, email, area, age, sex, remark, is_deleted \
         FROM students WHERE sex = ? AND is_deleted = 0 ORDER BY id",
    )
    .bind(sex)
    .fetch_all(db)
    .await
}

pub async fn insert_student(
    db: impl SqliteExecutor<'_>,
    req: NewStudentRequest,
) -> Result<Student, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO students (name, kana_name, nick_name, email, area, age, sex, remark, is_deleted) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)",
    )
    .bind(&req.name)
    .bind(&req.kana_name)
    .bind(&req.nick_name)
    .bind(&req.email)
    .bind(&req.area)
    .bind(req.age)
    .bind(&req.sex)
    .bind(&req.remark)
    .execute(db)
    .await?;

    Ok(Student {
        id: result.last_insert_rowid(),
        name: req.name,
        kana_name: req.kana_name,
        nick_name: req.nick_name,
        email: req.email,
        area: req.area,
        age: req.age,
        sex: req.sex,
        remark: req.remark,
        is_deleted: false,
    })
}

/// Full-row update by primary key. Returns the number of rows touched;
/// a missing id is zero rows, not an error.
pub async fn update_student(
    db: impl SqliteExecutor<'_>,
    student: &Student,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE students SET name = ?, kana_name = ?, nick_name = ?, email = ?, area = ?, \
         age = ?, sex = ?, remark = ?, is_deleted = ? WHERE id = ?",
    )
    .bind(&student.name)
    .bind(&student.kana_name)
    .bind(&student.nick_name)
    .bind(&student.email)
    .bind(&student.area)
    .bind(student.age)
    .bind(&student.sex)
    .bind(&student.remark)
    .bind(student.is_deleted)
    .bind(student.id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_student(db: impl SqliteExecutor<'_>, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE students SET is_deleted = 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

pub async fn restore_student(db: impl SqliteExecutor<'_>, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE students SET is_deleted = 0 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

pub async fn fetch_courses(db: impl SqliteExecutor<'_>) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, student_id, course_name, course_start_at, course_end_at \
         FROM courses ORDER BY id",
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_courses_by_student(
    db: impl SqliteExecutor<'_>,
    student_id: i64,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, student_id, course_name, course_start_at, course_end_at \
         FROM courses WHERE student_id = ? ORDER BY id",
    )
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn insert_course(
    db: impl SqliteExecutor<'_>,
    student_id: i64,
    course_name: String,
    course_start_at: DateTime<Utc>,
    course_end_at: DateTime<Utc>,
) -> Result<Course, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO courses (student_id, course_name, course_start_at, course_end_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(student_id)
    .bind(&course_name)
    .bind(course_start_at)
    .bind(course_end_at)
    .execute(db)
    .await?;

    Ok(Course {
        id: result.last_insert_rowid(),
        student_id,
        course_name,
        course_start_at,
        course_end_at,
    })
}

/// Updates the mutable course fields by primary key. The owning student is
/// fixed at creation and is not part of the SET list.
pub async fn update_course(
    db: impl SqliteExecutor<'_>,
    course: &Course,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE courses SET course_name = ?, course_start_at = ?, course_end_at = ? WHERE id = ?",
    )
    .bind(&course.course_name)
    .bind(course.course_start_at)
    .bind(course.course_end_at)
    .bind(course.id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

pub async fn fetch_statuses(
    db: impl SqliteExecutor<'_>,
) -> Result<Vec<ApplicationStatus>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationStatus>(
        "SELECT id, course_id, application_status, created_at, last_updated_at, \
         last_updated_by, notes, is_deleted \
         FROM application_statuses ORDER BY id",
    )
    .fetch_all(db)
    .await
}

/// First status row for the course, by insertion order. Duplicate rows for
/// one course are tolerated; callers only ever see the earliest.
pub async fn find_status_by_course(
    db: impl SqliteExecutor<'_>,
    course_id: i64,
) -> Result<Option<ApplicationStatus>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationStatus>(
        "SELECT id, course_id, application_status, created_at, last_updated_at, \
         last_updated_by, notes, is_deleted \
         FROM application_statuses WHERE course_id = ? ORDER BY id LIMIT 1",
    )
    .bind(course_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_status(
    db: impl SqliteExecutor<'_>,
    req: NewStatusRequest,
) -> Result<ApplicationStatus, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO application_statuses \
         (course_id, application_status, created_at, last_updated_at, last_updated_by, notes, is_deleted) \
         VALUES (?, ?, ?, ?, ?, ?, 0)",
    )
    .bind(req.course_id)
    .bind(&req.application_status)
    .bind(req.created_at)
    .bind(req.last_updated_at)
    .bind(&req.last_updated_by)
    .bind(&req.notes)
    .execute(db)
    .await?;

    Ok(ApplicationStatus {
        id: result.last_insert_rowid(),
        course_id: req.course_id,
        application_status: req.application_status,
        created_at: req.created_at,
        last_updated_at: req.last_updated_at,
        last_updated_by: req.last_updated_by,
        notes: req.notes,
        is_deleted: false,
    })
}

/// Overwrites label, actor and notes for the status rows owned by a course.
/// Timestamps are not touched here.
pub async fn update_status_by_course(
    db: impl SqliteExecutor<'_>,
    course_id: i64,
    req: &UpdateStatusRequest,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE application_statuses SET application_status = ?, last_updated_by = ?, notes = ? \
         WHERE course_id = ?",
    )
    .bind(&req.application_status)
    .bind(&req.last_updated_by)
    .bind(&req.notes)
    .bind(course_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_status(db: impl SqliteExecutor<'_>, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE application_statuses SET is_deleted = 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

pub async fn restore_status(db: impl SqliteExecutor<'_>, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE application_statuses SET is_deleted = 0 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite://:memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn taro() -> NewStudentRequest {
        NewStudentRequest {
            name: "Taro".to_string(),
            kana_name: "taro".to_string(),
            nick_name: "T".to_string(),
            email: "taro@example.com".to_string(),
            area: "Tokyo".to_string(),
            age: 20,
            sex: "male".to_string(),
            remark: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_student() {
        let pool = setup_test_db().await;

        let student = insert_student(&pool, taro())
            .await
            .expect("Failed to insert student");
        assert!(student.id > 0);
        assert!(!student.is_deleted);

        let students = fetch_students(&pool).await.expect("Failed to fetch students");
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "Taro");
    }

    #[tokio::test]
    async fn test_fetch_students_excludes_deleted() {
        let pool = setup_test_db().await;

        let student = insert_student(&pool, taro())
            .await
            .expect("Failed to insert student");
        delete_student(&pool, student.id)
            .await
            .expect("Failed to delete student");

        let students = fetch_students(&pool).await.expect("Failed to fetch students");
        assert!(students.is_empty());

        // Point lookup still sees the row, with the flag set.
        let found = find_student_by_id(&pool, student.id)
            .await
            .expect("Failed to find student")
            .expect("Student row should still exist");
        assert!(found.is_deleted);
    }

    #[tokio::test]
    async fn test_search_students_by_fields() {
        let pool = setup_test_db().await;

        insert_student(&pool, taro()).await.expect("Failed to insert student");

        let by_name = search_students_by_name(&pool, "Taro")
            .await
            .expect("Failed to search by name");
        assert_eq!(by_name.len(), 1);

        let by_area = search_students_by_area(&pool, "Osaka")
            .await
            .expect("Failed to search by area");
        assert!(by_area.is_empty());

        let by_age = search_students_by_age(&pool, 20)
            .await
            .expect("Failed to search by age");
        assert_eq!(by_age.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_course_and_first_status_wins() {
        let pool = setup_test_db().await;

        let student = insert_student(&pool, taro())
            .await
            .expect("Failed to insert student");
        let now = chrono::Utc::now();
        let course = insert_course(&pool, student.id, "Java Course".to_string(), now, now)
            .await
            .expect("Failed to insert course");

        let first = insert_status(
            &pool,
            NewStatusRequest {
                course_id: course.id,
                application_status: "provisional".to_string(),
                created_at: now,
                last_updated_at: now,
                last_updated_by: "system".to_string(),
                notes: None,
            },
        )
        .await
        .expect("Failed to insert status");

        insert_status(
            &pool,
            NewStatusRequest {
                course_id: course.id,
                application_status: "confirmed".to_string(),
                created_at: now,
                last_updated_at: now,
                last_updated_by: "admin".to_string(),
                notes: None,
            },
        )
        .await
        .expect("Failed to insert second status");

        let found = find_status_by_course(&pool, course.id)
            .await
            .expect("Failed to find status")
            .expect("Status should exist");
        assert_eq!(found.id, first.id);
        assert_eq!(found.application_status, "provisional");
    }

    #[tokio::test]
    async fn test_update_missing_rows_is_noop() {
        let pool = setup_test_db().await;

        let mut ghost = insert_student(&pool, taro())
            .await
            .expect("Failed to insert student");
        ghost.id = 9999;
        ghost.name = "Nobody".to_string();

        let affected = update_student(&pool, &ghost)
            .await
            .expect("Update should not fail");
        assert_eq!(affected, 0);

        let affected = delete_student(&pool, 9999)
            .await
            .expect("Delete should not fail");
        assert_eq!(affected, 0);

        let affected = restore_student(&pool, 9999)
            .await
            .expect("Restore should not fail");
        assert_eq!(affected, 0);

        let students = fetch_students(&pool).await.expect("Failed to fetch students");
        assert_eq!(students[0].name, "Taro");
    }

    #[tokio::test]
    async fn test_status_delete_and_restore_flags() {
        let pool = setup_test_db().await;

        let student = insert_student(&pool, taro())
            .await
            .expect("Failed to insert student");
        let now = chrono::Utc::now();
        let course = insert_course(&pool, student.id, "AWS Course".to_string(), now, now)
            .await
            .expect("Failed to insert course");
        let status = insert_status(
            &pool,
            NewStatusRequest {
                course_id: course.id,
                application_status: "provisional".to_string(),
                created_at: now,
                last_updated_at: now,
                last_updated_by: "system".to_string(),
                notes: None,
            },
        )
        .await
        .expect("Failed to insert status");

        delete_status(&pool, status.id)
            .await
            .expect("Failed to delete status");
        let found = find_status_by_course(&pool, course.id)
            .await
            .expect("Failed to find status")
            .expect("Status should exist");
        assert!(found.is_deleted);

        restore_status(&pool, status.id)
            .await
            .expect("Failed to restore status");
        let found = find_status_by_course(&pool, course.id)
            .await
            .expect("Failed to find status")
            .expect("Status should exist");
        assert!(!found.is_deleted);
    }
}
