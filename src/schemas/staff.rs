use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::StaffUser;
use crate::db::types::{AccountStatus, StaffRole};

#[derive(Debug, Deserialize)]
pub(crate) struct StaffLogin {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StaffPasswordUpdate {
    #[serde(alias = "currentPassword")]
    pub(crate) current_password: String,
    #[serde(alias = "newPassword")]
    pub(crate) new_password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminStaffUpdate {
    #[serde(default)]
    #[serde(alias = "fullName")]
    pub(crate) full_name: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<StaffRole>,
    #[serde(default)]
    pub(crate) status: Option<AccountStatus>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StaffResponse {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) full_name: String,
    pub(crate) role: StaffRole,
    pub(crate) status: AccountStatus,
    pub(crate) created_at: String,
}

impl StaffResponse {
    pub(crate) fn from_db(staff: StaffUser) -> Self {
        Self {
            id: staff.id,
            email: staff.email,
            full_name: staff.full_name,
            role: staff.role,
            status: staff.status,
            created_at: format_primitive(staff.created_at),
        }
    }
}
