use axum::{extract::Query, routing::get, routing::patch, routing::post, Json, Router};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CsrfGuard, CurrentAdmin, CurrentStaff, CurrentStudent};
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::EnrollmentStatus;
use crate::repositories;
use crate::repositories::enrollments::{RequestOutcome, TransitionOutcome};
use crate::schemas::enrollment::{
    AdminEnrollmentRow, EnrollmentRequest, EnrollmentResponse, EnrollmentStatsResponse,
    GradeUpdate, ReviewAction, ReviewRequest, StudentEnrollmentResponse,
};
use crate::services::admission;

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    status: Option<EnrollmentStatus>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(request_enrollment).get(list_enrollments))
        .route("/mine", get(my_enrollments))
        .route("/stats", get(enrollment_stats))
        .route("/:enrollment_id/drop", post(drop_enrollment))
        .route("/:enrollment_id/review", post(review_enrollment))
        .route("/:enrollment_id/grade", patch(update_grade))
}

async fn request_enrollment(
    CurrentStudent(student): CurrentStudent,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<EnrollmentRequest>,
) -> Result<(axum::http::StatusCode, Json<EnrollmentResponse>), ApiError> {
    // Admission gate first: ineligible students never touch the ledger.
    let eligible = admission::can_enroll(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check admission status"))?;
    if !eligible {
        record_request_outcome("admission_not_approved");
        return Err(ApiError::Conflict(
            "Admission must be approved before enrolling in courses".to_string(),
        ));
    }

    let outcome = repositories::enrollments::request_enrollment(
        state.db(),
        &student.id,
        &payload.course_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to request enrollment"))?;

    match outcome {
        RequestOutcome::Requested(enrollment) => {
            record_request_outcome("requested");
            tracing::info!(
                student_id = %student.id,
                course_id = %enrollment.course_id,
                enrollment_id = %enrollment.id,
                action = "enrollment_request",
                "Student requested enrollment"
            );
            Ok((axum::http::StatusCode::CREATED, Json(EnrollmentResponse::from_db(enrollment))))
        }
        RequestOutcome::AlreadyActive => {
            record_request_outcome("already_active");
            Err(ApiError::Conflict(
                "You are already enrolled or have a pending request for this course".to_string(),
            ))
        }
        RequestOutcome::CourseFull => {
            record_request_outcome("course_full");
            Err(ApiError::Conflict("This course is full".to_string()))
        }
        RequestOutcome::CourseInactive => {
            record_request_outcome("course_inactive");
            Err(ApiError::Conflict("This course is not open for enrollment".to_string()))
        }
        RequestOutcome::CourseNotFound => {
            record_request_outcome("course_not_found");
            Err(ApiError::NotFound("Course not found".to_string()))
        }
    }
}

async fn my_enrollments(
    CurrentStudent(student): CurrentStudent,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<StudentEnrollmentResponse>>, ApiError> {
    let rows = repositories::enrollments::list_for_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;

    Ok(Json(rows.into_iter().map(StudentEnrollmentResponse::from_row).collect()))
}

async fn drop_enrollment(
    axum::extract::Path(enrollment_id): axum::extract::Path<String>,
    CurrentStudent(student): CurrentStudent,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let outcome = repositories::enrollments::student_drop(
        state.db(),
        &student.id,
        &enrollment_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to drop enrollment"))?;

    match outcome {
        TransitionOutcome::Applied(enrollment) => {
            tracing::info!(
                student_id = %student.id,
                enrollment_id = %enrollment.id,
                course_id = %enrollment.course_id,
                action = "enrollment_drop",
                "Student dropped course"
            );
            Ok(Json(EnrollmentResponse::from_db(enrollment)))
        }
        TransitionOutcome::NotFound | TransitionOutcome::InvalidStatus(_) => Err(
            ApiError::Conflict("Invalid enrollment or cannot drop this course".to_string()),
        ),
    }
}

async fn list_enrollments(
    Query(params): Query<EnrollmentListQuery>,
    CurrentStaff(_staff): CurrentStaff,
    state: axum::extract::State<AppState>,
) -> Result<Json<PaginatedResponse<AdminEnrollmentRow>>, ApiError> {
    let search = params.search.as_ref().map(|value| value.trim().to_string()).filter(|value| {
        !value.is_empty()
    });

    let push_filters = |builder: &mut QueryBuilder<Postgres>| {
        let mut has_where = false;
        if let Some(search) = search.as_ref() {
            let pattern = format!("%{search}%");
            builder.push(" WHERE ");
            has_where = true;
            builder.push("(s.first_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR s.last_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR s.email ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR c.course_code ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR c.course_name ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        if let Some(status) = params.status {
            if !has_where {
                builder.push(" WHERE ");
            } else {
                builder.push(" AND ");
            }
            builder.push("e.status = ");
            builder.push_bind(status);
        }
    };

    let mut count_builder = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*)
         FROM enrollments e
         JOIN students s ON s.id = e.student_id
         JOIN courses c ON c.id = e.course_id",
    );
    push_filters(&mut count_builder);
    let total_count = count_builder
        .build_query_scalar::<i64>()
        .fetch_one(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count enrollments"))?;

    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT e.id,
                e.student_id,
                s.first_name,
                s.last_name,
                s.email,
                e.course_id,
                c.course_code,
                c.course_name,
                e.status,
                e.grade,
                e.enrolled_at
         FROM enrollments e
         JOIN students s ON s.id = e.student_id
         JOIN courses c ON c.id = e.course_id",
    );
    push_filters(&mut builder);
    builder.push(" ORDER BY e.enrolled_at DESC");
    builder.push(" OFFSET ");
    builder.push_bind(skip);
    builder.push(" LIMIT ");
    builder.push_bind(limit);

    let rows = builder
        .build_query_as::<AdminEnrollmentRow>()
        .fetch_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list enrollments"))?;

    Ok(Json(PaginatedResponse { items: rows, total_count, skip, limit }))
}

async fn enrollment_stats(
    CurrentStaff(_staff): CurrentStaff,
    state: axum::extract::State<AppState>,
) -> Result<Json<EnrollmentStatsResponse>, ApiError> {
    let counts = repositories::enrollments::status_counts(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load enrollment stats"))?;

    Ok(Json(EnrollmentStatsResponse::from_counts(counts)))
}

async fn review_enrollment(
    axum::extract::Path(enrollment_id): axum::extract::Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let now = primitive_now_utc();

    let outcome = match payload.action {
        ReviewAction::Approve => {
            repositories::enrollments::approve(state.db(), &enrollment_id, &admin.id, now)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to approve enrollment"))?
        }
        ReviewAction::Reject => repositories::enrollments::release(
            state.db(),
            &enrollment_id,
            EnrollmentStatus::Pending,
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reject enrollment"))?,
        ReviewAction::Drop => repositories::enrollments::release(
            state.db(),
            &enrollment_id,
            EnrollmentStatus::Enrolled,
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to drop enrollment"))?,
    };

    match outcome {
        TransitionOutcome::Applied(enrollment) => {
            metrics::counter!(
                "enrollment_reviews_total",
                "action" => review_action_label(payload.action)
            )
            .increment(1);
            tracing::info!(
                admin_id = %admin.id,
                enrollment_id = %enrollment.id,
                action = review_action_label(payload.action),
                "Admin reviewed enrollment"
            );
            Ok(Json(EnrollmentResponse::from_db(enrollment)))
        }
        TransitionOutcome::NotFound => {
            Err(ApiError::NotFound("Enrollment not found".to_string()))
        }
        TransitionOutcome::InvalidStatus(status) => Err(ApiError::Conflict(format!(
            "Enrollment cannot be {} from its current status ({status:?})",
            match payload.action {
                ReviewAction::Approve => "approved",
                ReviewAction::Reject => "rejected",
                ReviewAction::Drop => "dropped",
            }
        ))),
    }
}

async fn update_grade(
    axum::extract::Path(enrollment_id): axum::extract::Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<GradeUpdate>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    payload.validate().map_err(|_| {
        ApiError::BadRequest("Grade must be between 0 and 100".to_string())
    })?;

    let updated = repositories::enrollments::set_grade(
        state.db(),
        &enrollment_id,
        payload.grade,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update grade"))?;

    let Some(enrollment) = updated else {
        return Err(ApiError::NotFound("Enrollment not found".to_string()));
    };

    tracing::info!(
        admin_id = %admin.id,
        enrollment_id = %enrollment.id,
        action = "grade_update",
        "Admin updated grade"
    );

    Ok(Json(EnrollmentResponse::from_db(enrollment)))
}

fn record_request_outcome(outcome: &'static str) {
    metrics::counter!("enrollment_requests_total", "outcome" => outcome).increment(1);
}

fn review_action_label(action: ReviewAction) -> &'static str {
    match action {
        ReviewAction::Approve => "approve",
        ReviewAction::Reject => "reject",
        ReviewAction::Drop => "drop",
    }
}

#[cfg(test)]
mod tests;
