use axum::{routing::get, routing::patch, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::{CsrfGuard, CurrentAdmin, CurrentStaff};
use crate::api::validation::validate_password_strength;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::staff::{AdminStaffUpdate, StaffPasswordUpdate, StaffResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_staff))
        .route("/me/password", patch(update_my_password))
        .route("/:staff_id", patch(update_staff))
}

async fn list_staff(
    CurrentAdmin(_admin): CurrentAdmin,
    state: axum::extract::State<AppState>,
) -> Result<Json<Vec<StaffResponse>>, ApiError> {
    let staff = repositories::staff::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list staff accounts"))?;

    Ok(Json(staff.into_iter().map(StaffResponse::from_db).collect()))
}

async fn update_my_password(
    CurrentStaff(staff): CurrentStaff,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<StaffPasswordUpdate>,
) -> Result<Json<StaffResponse>, ApiError> {
    let verified = security::verify_password(&payload.current_password, &staff.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect current password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect current password"));
    }

    validate_password_strength(&payload.new_password)?;

    let hashed_password = security::hash_password(&payload.new_password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    repositories::staff::update(
        state.db(),
        &staff.id,
        repositories::staff::UpdateStaff {
            full_name: None,
            role: None,
            status: None,
            hashed_password: Some(hashed_password),
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update password"))?;

    let updated = repositories::staff::fetch_one_by_id(state.db(), &staff.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch staff account"))?;

    Ok(Json(StaffResponse::from_db(updated)))
}

async fn update_staff(
    axum::extract::Path(staff_id): axum::extract::Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    _csrf: CsrfGuard,
    state: axum::extract::State<AppState>,
    Json(payload): Json<AdminStaffUpdate>,
) -> Result<Json<StaffResponse>, ApiError> {
    let staff = repositories::staff::find_by_id(state.db(), &staff_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch staff account"))?;

    if staff.is_none() {
        return Err(ApiError::NotFound("Staff account not found".to_string()));
    }

    repositories::staff::update(
        state.db(),
        &staff_id,
        repositories::staff::UpdateStaff {
            full_name: payload.full_name,
            role: payload.role,
            status: payload.status,
            hashed_password: None,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update staff account"))?;

    let updated = repositories::staff::fetch_one_by_id(state.db(), &staff_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated staff account"))?;

    tracing::info!(
        admin_id = %admin.id,
        staff_id = %updated.id,
        action = "staff_update",
        "Admin updated staff account"
    );

    Ok(Json(StaffResponse::from_db(updated)))
}
