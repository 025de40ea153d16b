use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{AccountStatus, StaffRole};
use crate::repositories;

/// Provisions the configured admin account, repairing role/status/password
/// drift on restart.
pub(crate) async fn ensure_default_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_admin_password.is_empty() {
        tracing::warn!("FIRST_ADMIN_PASSWORD not configured; skipping default admin creation");
        return Ok(());
    }

    let email = &admin.first_admin_email;
    let staff = repositories::staff::find_by_email(state.db(), email).await?;
    let now = primitive_now_utc();

    if let Some(staff) = staff {
        let mut needs_update = false;
        let verified =
            security::verify_password(&admin.first_admin_password, &staff.hashed_password)
                .unwrap_or(false);

        let hashed_password = if verified {
            staff.hashed_password.clone()
        } else {
            needs_update = true;
            security::hash_password(&admin.first_admin_password)?
        };

        let role = if staff.role != StaffRole::Admin {
            needs_update = true;
            StaffRole::Admin
        } else {
            staff.role
        };

        let status = if staff.status != AccountStatus::Active {
            needs_update = true;
            AccountStatus::Active
        } else {
            staff.status
        };

        if needs_update {
            update_admin(state, &staff.id, hashed_password, role, status, now).await?;
            tracing::info!("Updated default admin {email}");
        } else {
            tracing::info!("Default admin already up to date");
        }

        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_admin_password)?;

    sqlx::query(
        "INSERT INTO staff_users (
            id, email, hashed_password, full_name, role, status, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(email)
    .bind(hashed_password)
    .bind("Registrar Admin")
    .bind(StaffRole::Admin)
    .bind(AccountStatus::Active)
    .bind(now)
    .bind(now)
    .execute(state.db())
    .await?;

    tracing::info!("Created default admin {email}");
    Ok(())
}

async fn update_admin(
    state: &AppState,
    staff_id: &str,
    hashed_password: String,
    role: StaffRole,
    status: AccountStatus,
    now: PrimitiveDateTime,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE staff_users
         SET hashed_password = $1,
             role = $2,
             status = $3,
             updated_at = $4
         WHERE id = $5",
    )
    .bind(hashed_password)
    .bind(role)
    .bind(status)
    .bind(now)
    .bind(staff_id)
    .execute(state.db())
    .await?;
    Ok(())
}
