use sqlx::PgPool;

use crate::db::models::Course;
use crate::db::types::CourseStatus;

pub(crate) const COLUMNS: &str = "\
    id, course_code, course_name, description, credits, max_capacity, current_enrollment, \
    instructor, schedule, semester, academic_year, department, prerequisites, status, \
    created_by, created_at, updated_at";

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_code: &'a str,
    pub(crate) course_name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) credits: i32,
    pub(crate) max_capacity: i32,
    pub(crate) instructor: Option<&'a str>,
    pub(crate) schedule: Option<&'a str>,
    pub(crate) semester: &'a str,
    pub(crate) academic_year: &'a str,
    pub(crate) department: Option<&'a str>,
    pub(crate) prerequisites: Option<&'a str>,
    pub(crate) created_by: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

/// Catalog edits touch descriptive fields and the capacity ceiling only.
/// `current_enrollment` and `status` belong to the enrollment engine and are
/// never written here, so lowering `max_capacity` below the live counter does
/// not recompute `status`.
pub(crate) struct UpdateCourse {
    pub(crate) course_name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) credits: Option<i32>,
    pub(crate) max_capacity: Option<i32>,
    pub(crate) instructor: Option<String>,
    pub(crate) schedule: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) academic_year: Option<String>,
    pub(crate) department: Option<String>,
    pub(crate) prerequisites: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, course_code, course_name, description, credits, max_capacity,
            current_enrollment, instructor, schedule, semester, academic_year,
            department, prerequisites, status, created_by, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,0,$7,$8,$9,$10,$11,$12,'active',$13,$14,$15)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_code)
    .bind(params.course_name)
    .bind(params.description)
    .bind(params.credits)
    .bind(params.max_capacity)
    .bind(params.instructor)
    .bind(params.schedule)
    .bind(params.semester)
    .bind(params.academic_year)
    .bind(params.department)
    .bind(params.prerequisites)
    .bind(params.created_by)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, course_id: &str) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn exists_by_code(
    pool: &PgPool,
    course_code: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM courses WHERE course_code = $1")
        .bind(course_code)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn update(
    pool: &PgPool,
    course_id: &str,
    params: UpdateCourse,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE courses SET
            course_name = COALESCE($1, course_name),
            description = COALESCE($2, description),
            credits = COALESCE($3, credits),
            max_capacity = COALESCE($4, max_capacity),
            instructor = COALESCE($5, instructor),
            schedule = COALESCE($6, schedule),
            semester = COALESCE($7, semester),
            academic_year = COALESCE($8, academic_year),
            department = COALESCE($9, department),
            prerequisites = COALESCE($10, prerequisites),
            updated_at = $11
         WHERE id = $12",
    )
    .bind(params.course_name)
    .bind(params.description)
    .bind(params.credits)
    .bind(params.max_capacity)
    .bind(params.instructor)
    .bind(params.schedule)
    .bind(params.semester)
    .bind(params.academic_year)
    .bind(params.department)
    .bind(params.prerequisites)
    .bind(params.updated_at)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Soft delete. `inactive` is sticky: nothing in the enrollment engine ever
/// flips it back.
pub(crate) async fn deactivate(
    pool: &PgPool,
    course_id: &str,
    updated_at: time::PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE courses SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(CourseStatus::Inactive)
        .bind(updated_at)
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
