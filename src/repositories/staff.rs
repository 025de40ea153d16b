use sqlx::PgPool;

use crate::db::models::StaffUser;
use crate::db::types::{AccountStatus, StaffRole};

pub(crate) const COLUMNS: &str =
    "id, email, hashed_password, full_name, role, status, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<StaffUser>, sqlx::Error> {
    sqlx::query_as::<_, StaffUser>(&format!("SELECT {COLUMNS} FROM staff_users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<StaffUser>, sqlx::Error> {
    sqlx::query_as::<_, StaffUser>(&format!("SELECT {COLUMNS} FROM staff_users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateStaff<'a> {
    pub(crate) id: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) full_name: &'a str,
    pub(crate) role: StaffRole,
    pub(crate) status: AccountStatus,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateStaff<'_>) -> Result<StaffUser, sqlx::Error> {
    sqlx::query_as::<_, StaffUser>(&format!(
        "INSERT INTO staff_users (
            id, email, hashed_password, full_name, role, status, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.full_name)
    .bind(params.role)
    .bind(params.status)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<StaffUser>, sqlx::Error> {
    sqlx::query_as::<_, StaffUser>(&format!(
        "SELECT {COLUMNS} FROM staff_users ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) struct UpdateStaff {
    pub(crate) full_name: Option<String>,
    pub(crate) role: Option<StaffRole>,
    pub(crate) status: Option<AccountStatus>,
    pub(crate) hashed_password: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateStaff,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE staff_users SET
            full_name = COALESCE($1, full_name),
            role = COALESCE($2, role),
            status = COALESCE($3, status),
            hashed_password = COALESCE($4, hashed_password),
            updated_at = $5
         WHERE id = $6",
    )
    .bind(params.full_name)
    .bind(params.role)
    .bind(params.status)
    .bind(params.hashed_password)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<StaffUser, sqlx::Error> {
    sqlx::query_as::<_, StaffUser>(&format!("SELECT {COLUMNS} FROM staff_users WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}
