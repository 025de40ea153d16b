use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{
    AccountStatus, AdmissionStatus, CourseStatus, EnrollmentStatus, StaffRole,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Student {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone: Option<String>,
    pub(crate) date_of_birth: Option<Date>,
    pub(crate) intended_major: Option<String>,
    pub(crate) status: AccountStatus,
    pub(crate) admission_status: AdmissionStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StaffUser {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) full_name: String,
    pub(crate) role: StaffRole,
    pub(crate) status: AccountStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) description: Option<String>,
    pub(crate) credits: i32,
    pub(crate) max_capacity: i32,
    pub(crate) current_enrollment: i32,
    pub(crate) instructor: Option<String>,
    pub(crate) schedule: Option<String>,
    pub(crate) semester: String,
    pub(crate) academic_year: String,
    pub(crate) department: Option<String>,
    pub(crate) prerequisites: Option<String>,
    pub(crate) status: CourseStatus,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) grade: Option<f64>,
    pub(crate) enrolled_at: PrimitiveDateTime,
    pub(crate) approved_by: Option<String>,
    pub(crate) approved_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
