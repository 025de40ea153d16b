use axum::{extract::Query, routing::get, Json, Router};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CsrfGuard, CurrentAdmin, Principal};
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::api::validation::validate_course_code;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Course;
use crate::db::types::CourseStatus;
use crate::repositories;
use crate::schemas::course::{CourseCreate, CourseDetailResponse, CourseResponse, CourseUpdate};

#[derive(Debug, Deserialize)]
pub(crate) struct CourseListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    status: Option<CourseStatus>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/:course_id",
            get(course_details).patch(update_course).delete(deactivate_course),
        )
}

async fn list_courses(
    Query(params): Query<CourseListQuery>,
    principal: Principal,
    state: axum::extract::State<AppState>,
) -> Result<Json<PaginatedResponse<CourseResponse>>, ApiError> {
    // Students only ever browse the live catalog; inactive entries are a
    // staff-facing concern.
    let status_filter = match &principal {
        Principal::Student(_) => match params.status {
            Some(CourseStatus::Inactive) => {
                return Err(ApiError::Forbidden("Staff access required"));
            }
            other => other,
        },
        Principal::Staff(_) => params.status,
    };
    let exclude_inactive = matches!(principal, Principal::Student(_)) && status_filter.is_none();

    let search = params.search.as_ref().map(|value| value.trim().to_string()).filter(|value| {
        !value.is_empty()
    });

    let push_filters = |builder: &mut QueryBuilder<Postgres>| {
        let mut has_where = false;
        if let Some(search) = search.as_ref() {
            let pattern = format!("%{search}%");
            builder.push(" WHERE ");
            has_where = true;
            builder.push("(course_code ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR course_name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        if let Some(status) = status_filter {
            if !has_where {
                builder.push(" WHERE ");
                has_where = true;
            } else {
                builder.push(" AND ");
            }
            builder.push("status = ");
            builder.push_bind(status);
        }
        if exclude_inactive {
            if !has_where {
                builder.push(" WHERE ");
            } else {
                builder.push(" AND ");
            }
            builder.push("status != ");
            builder.push_bind(CourseStatus::Inactive);
        }
    };

    let mut count_builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM courses");
    push_filters(&mut count_builder);
    let total_count = count_builder
        .build_query_scalar::<i64>()
        .fetch_one(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count courses"))?;

    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM courses",
        repositories::courses::COLUMNS
    ));
    push_filters(&mut builder);
    builder.push(" ORDER BY course_code");
    builder.push(" OFFSET ");
    builder.push_bind(skip);
    builder.push(" LIMIT ");
    builder.push_bind(limit);

    let courses = builder
        .build_query_as::<Course>()
        .fetch_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    Ok(Json(PaginatedResponse {
        items: courses.into_iter().map(CourseResponse::from_db).collect(),
        total_count,
        skip,
        limit,
    }))
}

async fn course_details(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    principal: Principal,
    state: axum::extract::State<AppState>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if matches!(principal, Principal::Student(_)) && course.status == CourseStatus::Inactive {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let enrolled_count =
        repositories::enrollments::seat_holding_count(state.db(), &course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count enrollments"))?;

    Ok(Json(CourseDetailResponse { course: CourseResponse::from_db(course), enrolled_count }))
}

async fn create_course(
    CurrentAdmin(admin): CurrentAdmin,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseCreate>,
) -> Result<(axum::http::StatusCode, Json<CourseResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course_code = payload.course_code.trim().to_ascii_uppercase();
    validate_course_code(&course_code)?;

    if payload.semester.trim().is_empty() || payload.academic_year.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Semester and academic year must not be empty".to_string(),
        ));
    }

    let existing = repositories::courses::exists_by_code(state.db(), &course_code)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing course"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Course code already exists".to_string()));
    }

    let now = primitive_now_utc();
    let course = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            course_code: &course_code,
            course_name: payload.course_name.trim(),
            description: payload.description.as_deref(),
            credits: payload.credits,
            max_capacity: payload.max_capacity,
            instructor: payload.instructor.as_deref(),
            schedule: payload.schedule.as_deref(),
            semester: payload.semester.trim(),
            academic_year: payload.academic_year.trim(),
            department: payload.department.as_deref(),
            prerequisites: payload.prerequisites.as_deref(),
            created_by: &admin.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Course code already exists".to_string())
        } else {
            ApiError::internal(e, "Failed to create course")
        }
    })?;

    tracing::info!(
        admin_id = %admin.id,
        course_id = %course.id,
        course_code = %course.course_code,
        action = "course_create",
        "Admin created course"
    );

    Ok((axum::http::StatusCode::CREATED, Json(CourseResponse::from_db(course))))
}

async fn update_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<CourseResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?;
    if course.is_none() {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    repositories::courses::update(
        state.db(),
        &course_id,
        repositories::courses::UpdateCourse {
            course_name: payload.course_name,
            description: payload.description,
            credits: payload.credits,
            max_capacity: payload.max_capacity,
            instructor: payload.instructor,
            schedule: payload.schedule,
            semester: payload.semester,
            academic_year: payload.academic_year,
            department: payload.department,
            prerequisites: payload.prerequisites,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update course"))?;

    let updated = repositories::courses::fetch_one_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated course"))?;

    Ok(Json(CourseResponse::from_db(updated)))
}

async fn deactivate_course(
    axum::extract::Path(course_id): axum::extract::Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
) -> Result<axum::http::StatusCode, ApiError> {
    let deactivated =
        repositories::courses::deactivate(state.db(), &course_id, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to deactivate course"))?;

    if !deactivated {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    tracing::info!(
        admin_id = %admin.id,
        course_id = %course_id,
        action = "course_deactivate",
        "Admin deactivated course"
    );

    Ok(axum::http::StatusCode::NO_CONTENT)
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests;
