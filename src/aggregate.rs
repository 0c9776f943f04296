//! Assembles flat student, course and application-status rows into the
//! nested per-student view. Pure functions, no I/O; callers decide what
//! filtering the input rows have already been through.

use std::collections::HashMap;

use crate::models::{ApplicationStatus, Course, CourseDetail, Student, StudentDetail};

/// Builds one `StudentDetail` per input student, in input order.
///
/// Courses attach to the student owning them, keeping course input order.
/// Each course takes the first status in input order whose `course_id`
/// matches, or `None`. A course may carry duplicate status rows in storage;
/// everything after the first match is left out of the view. Rows that match
/// nothing are dropped without error.
pub fn assemble(
    students: Vec<Student>,
    courses: Vec<Course>,
    statuses: Vec<ApplicationStatus>,
) -> Vec<StudentDetail> {
    // Index children by foreign key once instead of rescanning the flat
    // lists for every parent. `or_insert` keeps the earliest status row,
    // which is the tie-break downstream callers rely on.
    let mut status_by_course: HashMap<i64, ApplicationStatus> = HashMap::new();
    for status in statuses {
        status_by_course.entry(status.course_id).or_insert(status);
    }

    let mut courses_by_student: HashMap<i64, Vec<Course>> = HashMap::new();
    for course in courses {
        courses_by_student
            .entry(course.student_id)
            .or_default()
            .push(course);
    }

    students
        .into_iter()
        .map(|student| {
            let courses = courses_by_student
                .remove(&student.id)
                .unwrap_or_default()
                .into_iter()
                .map(|course| {
                    let application_status = status_by_course.remove(&course.id);
                    CourseDetail {
                        course,
                        application_status,
                    }
                })
                .collect();

            StudentDetail { student, courses }
        })
        .collect()
}
