use sqlx::PgPool;

use crate::db::models::Student;
use crate::db::types::{AccountStatus, AdmissionStatus};

pub(crate) const COLUMNS: &str = "\
    id, email, hashed_password, first_name, last_name, phone, date_of_birth, \
    intended_major, status, admission_status, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM students WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_admission_status(
    pool: &PgPool,
    id: &str,
) -> Result<Option<AdmissionStatus>, sqlx::Error> {
    sqlx::query_scalar::<_, AdmissionStatus>("SELECT admission_status FROM students WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateStudent<'a> {
    pub(crate) id: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) phone: Option<&'a str>,
    pub(crate) date_of_birth: Option<time::Date>,
    pub(crate) intended_major: Option<&'a str>,
    pub(crate) status: AccountStatus,
    pub(crate) admission_status: AdmissionStatus,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateStudent<'_>) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            id, email, hashed_password, first_name, last_name, phone, date_of_birth,
            intended_major, status, admission_status, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.phone)
    .bind(params.date_of_birth)
    .bind(params.intended_major)
    .bind(params.status)
    .bind(params.admission_status)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

/// Self-service profile edit: identity and academic metadata only. Account
/// status and the admission decision are admin territory.
pub(crate) struct UpdateProfile {
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) date_of_birth: Option<time::Date>,
    pub(crate) intended_major: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update_profile(
    pool: &PgPool,
    id: &str,
    params: UpdateProfile,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE students SET
            first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name),
            phone = COALESCE($3, phone),
            date_of_birth = COALESCE($4, date_of_birth),
            intended_major = COALESCE($5, intended_major),
            updated_at = $6
         WHERE id = $7",
    )
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.phone)
    .bind(params.date_of_birth)
    .bind(params.intended_major)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) struct AdminUpdate {
    pub(crate) status: Option<AccountStatus>,
    pub(crate) admission_status: Option<AdmissionStatus>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn admin_update(
    pool: &PgPool,
    id: &str,
    params: AdminUpdate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE students SET
            status = COALESCE($1, status),
            admission_status = COALESCE($2, admission_status),
            updated_at = $3
         WHERE id = $4",
    )
    .bind(params.status)
    .bind(params.admission_status)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}
