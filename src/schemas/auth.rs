use serde::Serialize;

use crate::schemas::staff::StaffResponse;
use crate::schemas::student::StudentResponse;

#[derive(Debug, Serialize)]
pub(crate) struct StudentTokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) csrf_token: String,
    pub(crate) student: StudentResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct StaffTokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) csrf_token: String,
    pub(crate) staff: StaffResponse,
}
