use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Student;
use crate::db::types::{AccountStatus, AdmissionStatus};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentRegister {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    pub(crate) password: String,
    #[serde(alias = "firstName")]
    #[validate(length(min = 1, max = 100, message = "first_name must be 1..100 characters"))]
    pub(crate) first_name: String,
    #[serde(alias = "lastName")]
    #[validate(length(min = 1, max = 100, message = "last_name must be 1..100 characters"))]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) phone: Option<String>,
    #[serde(default)]
    #[serde(alias = "dateOfBirth")]
    pub(crate) date_of_birth: Option<Date>,
    #[serde(default)]
    #[serde(alias = "intendedMajor")]
    pub(crate) intended_major: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentLogin {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentProfileUpdate {
    #[serde(default)]
    #[serde(alias = "firstName")]
    #[validate(length(min = 1, max = 100, message = "first_name must be 1..100 characters"))]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    #[serde(alias = "lastName")]
    #[validate(length(min = 1, max = 100, message = "last_name must be 1..100 characters"))]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) phone: Option<String>,
    #[serde(default)]
    #[serde(alias = "dateOfBirth")]
    pub(crate) date_of_birth: Option<Date>,
    #[serde(default)]
    #[serde(alias = "intendedMajor")]
    pub(crate) intended_major: Option<String>,
}

/// Admin decisions on an account: suspension and the admission gate.
#[derive(Debug, Deserialize)]
pub(crate) struct AdminStudentUpdate {
    #[serde(default)]
    pub(crate) status: Option<AccountStatus>,
    #[serde(default)]
    #[serde(alias = "admissionStatus")]
    pub(crate) admission_status: Option<AdmissionStatus>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone: Option<String>,
    pub(crate) date_of_birth: Option<Date>,
    pub(crate) intended_major: Option<String>,
    pub(crate) status: AccountStatus,
    pub(crate) admission_status: AdmissionStatus,
    pub(crate) created_at: String,
}

impl StudentResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            id: student.id,
            email: student.email,
            first_name: student.first_name,
            last_name: student.last_name,
            phone: student.phone,
            date_of_birth: student.date_of_birth,
            intended_major: student.intended_major,
            status: student.status,
            admission_status: student.admission_status,
            created_at: format_primitive(student.created_at),
        }
    }
}
