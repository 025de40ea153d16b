use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Enrollment;
use crate::db::types::EnrollmentStatus;
use crate::repositories::enrollments::{StatusCounts, StudentEnrollmentRow};

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentRequest {
    #[serde(alias = "courseId")]
    pub(crate) course_id: String,
}

/// The admin decision on an enrollment row. Closed set; anything else is
/// rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ReviewAction {
    Approve,
    Reject,
    Drop,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) action: ReviewAction,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GradeUpdate {
    #[validate(range(min = 0.0, max = 100.0, message = "grade must be between 0 and 100"))]
    pub(crate) grade: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) grade: Option<f64>,
    pub(crate) enrolled_at: String,
    pub(crate) approved_by: Option<String>,
    pub(crate) approved_at: Option<String>,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            course_id: enrollment.course_id,
            status: enrollment.status,
            grade: enrollment.grade,
            enrolled_at: format_primitive(enrollment.enrolled_at),
            approved_by: enrollment.approved_by,
            approved_at: enrollment.approved_at.map(format_primitive),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentEnrollmentResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) credits: i32,
    pub(crate) instructor: Option<String>,
    pub(crate) semester: String,
    pub(crate) academic_year: String,
    pub(crate) schedule: Option<String>,
    pub(crate) status: EnrollmentStatus,
    pub(crate) grade: Option<f64>,
    pub(crate) enrolled_at: String,
}

impl StudentEnrollmentResponse {
    pub(crate) fn from_row(row: StudentEnrollmentRow) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            course_code: row.course_code,
            course_name: row.course_name,
            credits: row.credits,
            instructor: row.instructor,
            semester: row.semester,
            academic_year: row.academic_year,
            schedule: row.schedule,
            status: row.status,
            grade: row.grade,
            enrolled_at: format_primitive(row.enrolled_at),
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub(crate) struct AdminEnrollmentRow {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) course_id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) grade: Option<f64>,
    #[serde(serialize_with = "serialize_primitive")]
    pub(crate) enrolled_at: time::PrimitiveDateTime,
}

fn serialize_primitive<S>(
    value: &time::PrimitiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_primitive(*value))
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentStatsResponse {
    pub(crate) total: i64,
    pub(crate) pending: i64,
    pub(crate) enrolled: i64,
    pub(crate) completed: i64,
    pub(crate) dropped: i64,
}

impl EnrollmentStatsResponse {
    pub(crate) fn from_counts(counts: StatusCounts) -> Self {
        Self {
            total: counts.total,
            pending: counts.pending,
            enrolled: counts.enrolled,
            completed: counts.completed,
            dropped: counts.dropped,
        }
    }
}
