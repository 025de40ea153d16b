use axum::{extract::Query, routing::get, Json, Router};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{CsrfGuard, CurrentAdmin, CurrentStaff, CurrentStudent};
use crate::api::pagination::default_limit;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Student;
use crate::db::types::{AccountStatus, AdmissionStatus};
use crate::repositories;
use crate::schemas::student::{AdminStudentUpdate, StudentProfileUpdate, StudentResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct StudentListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    status: Option<AccountStatus>,
    #[serde(default)]
    #[serde(alias = "admissionStatus")]
    admission_status: Option<AdmissionStatus>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route("/", get(list_students))
        .route("/:student_id", get(get_student).patch(update_student))
}

async fn me(CurrentStudent(student): CurrentStudent) -> Json<StudentResponse> {
    Json(StudentResponse::from_db(student))
}

async fn update_me(
    CurrentStudent(student): CurrentStudent,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<StudentProfileUpdate>,
) -> Result<Json<StudentResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    repositories::students::update_profile(
        state.db(),
        &student.id,
        repositories::students::UpdateProfile {
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            date_of_birth: payload.date_of_birth,
            intended_major: payload.intended_major,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update profile"))?;

    let updated = repositories::students::fetch_one_by_id(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated profile"))?;

    Ok(Json(StudentResponse::from_db(updated)))
}

async fn list_students(
    Query(params): Query<StudentListQuery>,
    CurrentStaff(_staff): CurrentStaff,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM students",
        repositories::students::COLUMNS
    ));
    let mut has_where = false;

    if let Some(search) = params.search.as_ref().filter(|value| !value.trim().is_empty()) {
        builder.push(" WHERE ");
        has_where = true;
        let pattern = format!("%{}%", search.trim());
        builder.push("(first_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR last_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR email ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    if let Some(status) = params.status {
        if !has_where {
            builder.push(" WHERE ");
            has_where = true;
        } else {
            builder.push(" AND ");
        }
        builder.push("status = ");
        builder.push_bind(status);
    }
    if let Some(admission_status) = params.admission_status {
        if !has_where {
            builder.push(" WHERE ");
        } else {
            builder.push(" AND ");
        }
        builder.push("admission_status = ");
        builder.push_bind(admission_status);
    }

    builder.push(" ORDER BY created_at DESC");
    builder.push(" OFFSET ");
    builder.push_bind(params.skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(params.limit.clamp(1, 1000));

    let students = builder
        .build_query_as::<Student>()
        .fetch_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(students.into_iter().map(StudentResponse::from_db).collect()))
}

async fn get_student(
    axum::extract::Path(student_id): axum::extract::Path<String>,
    CurrentStaff(_staff): CurrentStaff,
    state: axum::extract::State<AppState>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = repositories::students::find_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?;

    let Some(student) = student else {
        return Err(ApiError::NotFound("Student not found".to_string()));
    };

    Ok(Json(StudentResponse::from_db(student)))
}

async fn update_student(
    axum::extract::Path(student_id): axum::extract::Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<AdminStudentUpdate>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = repositories::students::find_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?;

    if student.is_none() {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    repositories::students::admin_update(
        state.db(),
        &student_id,
        repositories::students::AdminUpdate {
            status: payload.status,
            admission_status: payload.admission_status,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update student"))?;

    let updated = repositories::students::fetch_one_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated student"))?;

    tracing::info!(
        admin_id = %admin.id,
        student_id = %updated.id,
        admission_status = ?updated.admission_status,
        status = ?updated.status,
        action = "student_review",
        "Admin updated student account"
    );

    Ok(Json(StudentResponse::from_db(updated)))
}
