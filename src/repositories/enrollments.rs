use sqlx::{PgPool, Postgres, Transaction};
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::db::models::{Course, Enrollment};
use crate::db::types::{CourseStatus, EnrollmentStatus};
use crate::repositories::courses::COLUMNS as COURSE_COLUMNS;

pub(crate) const COLUMNS: &str = "\
    id, student_id, course_id, status, grade, enrolled_at, approved_by, approved_at, \
    created_at, updated_at";

/// Result of a student enrollment request. Every non-`Requested` variant
/// leaves the ledger and the course counter untouched.
#[derive(Debug)]
pub(crate) enum RequestOutcome {
    Requested(Enrollment),
    AlreadyActive,
    CourseFull,
    CourseInactive,
    CourseNotFound,
}

/// Result of a status transition on an existing enrollment row.
#[derive(Debug)]
pub(crate) enum TransitionOutcome {
    Applied(Enrollment),
    NotFound,
    InvalidStatus(EnrollmentStatus),
}

/// Creates (or revives) the pending enrollment for a student and claims a
/// seat, all inside one transaction. The course row is locked up front so the
/// capacity check, the ledger write and the counter update can never
/// interleave with a concurrent request; the guarded counter update is kept
/// as a second line of defence against overselling.
pub(crate) async fn request_enrollment(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
    now: PrimitiveDateTime,
) -> Result<RequestOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let course = sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 FOR UPDATE"
    ))
    .bind(course_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(course) = course else {
        return Ok(RequestOutcome::CourseNotFound);
    };

    if course.status == CourseStatus::Inactive {
        return Ok(RequestOutcome::CourseInactive);
    }

    let existing = sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE student_id = $1 AND course_id = $2 FOR UPDATE"
    ))
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(existing) = existing.as_ref() {
        if existing.status.holds_seat() {
            return Ok(RequestOutcome::AlreadyActive);
        }
    }

    if course.current_enrollment >= course.max_capacity {
        return Ok(RequestOutcome::CourseFull);
    }

    let enrollment = match existing {
        Some(prior) => {
            // Single-row-per-pair model: a previously dropped or completed row
            // is reset to a fresh pending request.
            sqlx::query_as::<_, Enrollment>(&format!(
                "UPDATE enrollments
                 SET status = 'pending',
                     grade = NULL,
                     approved_by = NULL,
                     approved_at = NULL,
                     enrolled_at = $1,
                     updated_at = $1
                 WHERE id = $2
                 RETURNING {COLUMNS}"
            ))
            .bind(now)
            .bind(&prior.id)
            .fetch_one(&mut *tx)
            .await?
        }
        None => {
            sqlx::query_as::<_, Enrollment>(&format!(
                "INSERT INTO enrollments (
                    id, student_id, course_id, status, enrolled_at, created_at, updated_at
                ) VALUES ($1,$2,$3,'pending',$4,$4,$4)
                RETURNING {COLUMNS}"
            ))
            .bind(Uuid::new_v4().to_string())
            .bind(student_id)
            .bind(course_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    let claimed = sqlx::query(
        "UPDATE courses
         SET current_enrollment = current_enrollment + 1,
             status = CASE
                WHEN current_enrollment + 1 >= max_capacity THEN 'full'::coursestatus
                ELSE status
             END,
             updated_at = $2
         WHERE id = $1 AND current_enrollment < max_capacity",
    )
    .bind(course_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if claimed.rows_affected() == 0 {
        // Rolls back the ledger write along with the rest of the transaction.
        return Ok(RequestOutcome::CourseFull);
    }

    tx.commit().await?;
    Ok(RequestOutcome::Requested(enrollment))
}

/// Approval keeps the counter untouched: the seat was already claimed when
/// the request was made.
pub(crate) async fn approve(
    pool: &PgPool,
    enrollment_id: &str,
    approved_by: &str,
    now: PrimitiveDateTime,
) -> Result<TransitionOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(enrollment) = lock_enrollment(&mut tx, enrollment_id).await? else {
        return Ok(TransitionOutcome::NotFound);
    };

    if enrollment.status != EnrollmentStatus::Pending {
        return Ok(TransitionOutcome::InvalidStatus(enrollment.status));
    }

    let updated = sqlx::query_as::<_, Enrollment>(&format!(
        "UPDATE enrollments
         SET status = 'enrolled', approved_by = $1, approved_at = $2, updated_at = $2
         WHERE id = $3
         RETURNING {COLUMNS}"
    ))
    .bind(approved_by)
    .bind(now)
    .bind(enrollment_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(TransitionOutcome::Applied(updated))
}

/// Admin release path (reject a pending request or drop an active
/// enrollment): frees the seat and reopens a full course, but never
/// resurrects an inactive one.
pub(crate) async fn release(
    pool: &PgPool,
    enrollment_id: &str,
    expected_status: EnrollmentStatus,
    now: PrimitiveDateTime,
) -> Result<TransitionOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let Some(enrollment) = lock_enrollment(&mut tx, enrollment_id).await? else {
        return Ok(TransitionOutcome::NotFound);
    };

    if enrollment.status != expected_status {
        return Ok(TransitionOutcome::InvalidStatus(enrollment.status));
    }

    let updated = mark_dropped(&mut tx, enrollment_id, now).await?;

    sqlx::query(
        "UPDATE courses
         SET current_enrollment = GREATEST(current_enrollment - 1, 0),
             status = CASE
                WHEN status = 'full'::coursestatus
                     AND current_enrollment - 1 < max_capacity THEN 'active'::coursestatus
                ELSE status
             END,
             updated_at = $2
         WHERE id = $1",
    )
    .bind(&enrollment.course_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(TransitionOutcome::Applied(updated))
}

/// Student self-drop: only active enrollments can be dropped (pending
/// requests are cancelled through the admin reject path). Frees the seat but
/// leaves the catalog status untouched; the admin release path is the one
/// that reopens a full course.
pub(crate) async fn student_drop(
    pool: &PgPool,
    student_id: &str,
    enrollment_id: &str,
    now: PrimitiveDateTime,
) -> Result<TransitionOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE id = $1 AND student_id = $2 FOR UPDATE"
    ))
    .bind(enrollment_id)
    .bind(student_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(enrollment) = enrollment else {
        return Ok(TransitionOutcome::NotFound);
    };

    if enrollment.status != EnrollmentStatus::Enrolled {
        return Ok(TransitionOutcome::InvalidStatus(enrollment.status));
    }

    let updated = mark_dropped(&mut tx, enrollment_id, now).await?;

    sqlx::query(
        "UPDATE courses
         SET current_enrollment = GREATEST(current_enrollment - 1, 0),
             updated_at = $2
         WHERE id = $1",
    )
    .bind(&enrollment.course_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(TransitionOutcome::Applied(updated))
}

pub(crate) async fn set_grade(
    pool: &PgPool,
    enrollment_id: &str,
    grade: f64,
    now: PrimitiveDateTime,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "UPDATE enrollments SET grade = $1, updated_at = $2 WHERE id = $3 RETURNING {COLUMNS}"
    ))
    .bind(grade)
    .bind(now)
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    enrollment_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1"))
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct StudentEnrollmentRow {
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
    pub(crate) enrolled_at: PrimitiveDateTime,
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<StudentEnrollmentRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentEnrollmentRow>(
        "SELECT e.id,
                e.course_id,
                c.course_code,
                c.course_name,
                c.credits,
                c.instructor,
                c.semester,
                c.academic_year,
                c.schedule,
                e.status,
                e.grade,
                e.enrolled_at
         FROM enrollments e
         JOIN courses c ON c.id = e.course_id
         WHERE e.student_id = $1
         ORDER BY e.enrolled_at DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StatusCounts {
    pub(crate) total: i64,
    pub(crate) pending: i64,
    pub(crate) enrolled: i64,
    pub(crate) completed: i64,
    pub(crate) dropped: i64,
}

pub(crate) async fn status_counts(pool: &PgPool) -> Result<StatusCounts, sqlx::Error> {
    sqlx::query_as::<_, StatusCounts>(
        "SELECT COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'enrolled') AS enrolled,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'dropped') AS dropped
         FROM enrollments",
    )
    .fetch_one(pool)
    .await
}

/// Live count of seat-holding rows for a course; the catalog counter must
/// always agree with this.
pub(crate) async fn seat_holding_count(
    pool: &PgPool,
    course_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments
         WHERE course_id = $1 AND status IN ('pending', 'enrolled')",
    )
    .bind(course_id)
    .fetch_one(pool)
    .await
}

async fn lock_enrollment(
    tx: &mut Transaction<'_, Postgres>,
    enrollment_id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {COLUMNS} FROM enrollments WHERE id = $1 FOR UPDATE"
    ))
    .bind(enrollment_id)
    .fetch_optional(&mut **tx)
    .await
}

async fn mark_dropped(
    tx: &mut Transaction<'_, Postgres>,
    enrollment_id: &str,
    now: PrimitiveDateTime,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "UPDATE enrollments SET status = 'dropped', updated_at = $1 WHERE id = $2
         RETURNING {COLUMNS}"
    ))
    .bind(now)
    .bind(enrollment_id)
    .fetch_one(&mut **tx)
    .await
}
