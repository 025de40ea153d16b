use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::validation::validate_password_strength;
use crate::core::security::{self, PrincipalKind};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{StaffUser, Student};
use crate::db::types::{AccountStatus, AdmissionStatus};
use crate::repositories;
use crate::schemas::auth::{StaffTokenResponse, StudentTokenResponse};
use crate::schemas::staff::{StaffLogin, StaffResponse};
use crate::schemas::student::{StudentLogin, StudentRegister, StudentResponse};

/// Max attempts per window for auth endpoints (register/login).
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/staff/login", post(staff_login))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<StudentRegister>,
) -> Result<(StatusCode, Json<StudentTokenResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_password_strength(&payload.password)?;

    let email = payload.email.trim().to_ascii_lowercase();

    let rate_key = format!("rl:register:{email}");
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many registration attempts, try again later"));
    }

    let existing = repositories::students::exists_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing student"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("An account with this email already exists".to_string()));
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();
    let student = repositories::students::create(
        state.db(),
        repositories::students::CreateStudent {
            id: &Uuid::new_v4().to_string(),
            email: &email,
            hashed_password,
            first_name: payload.first_name.trim(),
            last_name: payload.last_name.trim(),
            phone: payload.phone.as_deref(),
            date_of_birth: payload.date_of_birth,
            intended_major: payload.intended_major.as_deref(),
            status: AccountStatus::Active,
            // New registrations wait for an admission decision before they
            // can request enrollments.
            admission_status: AdmissionStatus::Pending,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create student"))?;

    let response = student_token_response(&state, student)?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<StudentLogin>,
) -> Result<Json<StudentTokenResponse>, ApiError> {
    let email = payload.email.trim().to_ascii_lowercase();

    let rate_key = format!("rl:login:{email}");
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    let student = repositories::students::find_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?
        .ok_or(ApiError::Unauthorized("Incorrect email or password"))?;

    let verified = security::verify_password(&payload.password, &student.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect email or password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Incorrect email or password"));
    }

    if student.status != AccountStatus::Active {
        return Err(ApiError::BadRequest("Inactive account".to_string()));
    }

    let response = student_token_response(&state, student)?;
    Ok(Json(response))
}

async fn staff_login(
    State(state): State<AppState>,
    Json(payload): Json<StaffLogin>,
) -> Result<Json<StaffTokenResponse>, ApiError> {
    let email = payload.email.trim().to_ascii_lowercase();

    let rate_key = format!("rl:staff-login:{email}");
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    let staff = repositories::staff::find_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load staff account"))?
        .ok_or(ApiError::Unauthorized("Incorrect email or password"))?;

    let verified = security::verify_password(&payload.password, &staff.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect email or password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Incorrect email or password"));
    }

    if staff.status != AccountStatus::Active {
        return Err(ApiError::BadRequest("Inactive account".to_string()));
    }

    let response = staff_token_response(&state, staff)?;
    Ok(Json(response))
}

fn student_token_response(
    state: &AppState,
    student: Student,
) -> Result<StudentTokenResponse, ApiError> {
    let csrf_token = security::generate_csrf_token();
    let access_token = security::create_access_token(
        &student.id,
        PrincipalKind::Student,
        &csrf_token,
        state.settings(),
        None,
    )
    .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(StudentTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        csrf_token,
        student: StudentResponse::from_db(student),
    })
}

fn staff_token_response(state: &AppState, staff: StaffUser) -> Result<StaffTokenResponse, ApiError> {
    let csrf_token = security::generate_csrf_token();
    let access_token = security::create_access_token(
        &staff.id,
        PrincipalKind::Staff,
        &csrf_token,
        state.settings(),
        None,
    )
    .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(StaffTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        csrf_token,
        staff: StaffResponse::from_db(staff),
    })
}
