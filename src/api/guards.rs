use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts, HeaderName};

use crate::api::errors::ApiError;
use crate::core::security::{self, Claims, PrincipalKind};
use crate::core::state::AppState;
use crate::db::models::{StaffUser, Student};
use crate::db::types::{AccountStatus, StaffRole};
use crate::repositories;

pub(crate) const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

pub(crate) struct CurrentStudent(pub(crate) Student);
pub(crate) struct CurrentStaff(pub(crate) StaffUser);
pub(crate) struct CurrentAdmin(pub(crate) StaffUser);

/// Either kind of authenticated account, for the surfaces both share
/// (catalog browsing).
pub(crate) enum Principal {
    Student(Student),
    Staff(StaffUser),
}

/// Anti-forgery check for state-mutating endpoints: the `X-CSRF-Token`
/// header must match the token minted into the caller's session claims.
pub(crate) struct CsrfGuard;

async fn claims_from_parts(parts: &mut Parts, state: &AppState) -> Result<Claims, ApiError> {
    let State(app_state) = State::<AppState>::from_request_parts(parts, state)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

    security::verify_token(token, app_state.settings())
        .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))
}

async fn load_student(state: &AppState, claims: &Claims) -> Result<Student, ApiError> {
    let student = repositories::students::find_by_id(state.db(), &claims.sub)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?;

    let Some(student) = student else {
        return Err(ApiError::Unauthorized("Invalid authentication credentials"));
    };

    if student.status != AccountStatus::Active {
        return Err(ApiError::Unauthorized("Invalid authentication credentials"));
    }

    Ok(student)
}

async fn load_staff(state: &AppState, claims: &Claims) -> Result<StaffUser, ApiError> {
    let staff = repositories::staff::find_by_id(state.db(), &claims.sub)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load staff account"))?;

    let Some(staff) = staff else {
        return Err(ApiError::Unauthorized("Invalid authentication credentials"));
    };

    if staff.status != AccountStatus::Active {
        return Err(ApiError::Unauthorized("Invalid authentication credentials"));
    }

    Ok(staff)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state).await?;
        match claims.kind {
            PrincipalKind::Student => Ok(CurrentStudent(load_student(state, &claims).await?)),
            PrincipalKind::Staff => Err(ApiError::Forbidden("Student access required")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state).await?;
        match claims.kind {
            PrincipalKind::Staff => Ok(CurrentStaff(load_staff(state, &claims).await?)),
            PrincipalKind::Student => Err(ApiError::Forbidden("Staff access required")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentStaff(staff) = CurrentStaff::from_request_parts(parts, state).await?;

        match staff.role {
            StaffRole::Admin => Ok(CurrentAdmin(staff)),
            StaffRole::Registrar => Err(ApiError::Forbidden("Admin access required")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state).await?;
        match claims.kind {
            PrincipalKind::Student => {
                Ok(Principal::Student(load_student(state, &claims).await?))
            }
            PrincipalKind::Staff => Ok(Principal::Staff(load_staff(state, &claims).await?)),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CsrfGuard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state).await?;

        let provided = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Forbidden("Invalid security token"))?;

        if security::tokens_match(&claims.csrf, provided) {
            Ok(CsrfGuard)
        } else {
            Err(ApiError::Forbidden("Invalid security token"))
        }
    }
}
