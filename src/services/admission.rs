use sqlx::PgPool;

use crate::db::types::AdmissionStatus;
use crate::repositories;

/// Admission gate: only students with an approved admission may create new
/// enrollment requests. Callers must check this before touching the ledger;
/// the read is not part of the enrollment transaction, which is an accepted
/// consistency gap.
pub(crate) async fn can_enroll(pool: &PgPool, student_id: &str) -> Result<bool, sqlx::Error> {
    let status = repositories::students::find_admission_status(pool, student_id).await?;
    Ok(matches!(status, Some(AdmissionStatus::Approved)))
}
