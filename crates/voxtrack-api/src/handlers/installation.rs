//! Installation handlers.

use tracing::info;

use voxtrack_core::error::AppError;
use voxtrack_database::store::UsageStore;
use voxtrack_entity::installation::Installation;

use crate::dto::NewInstallationForm;
use crate::error::ApiError;
use crate::extractors::{RequestStore, StrictForm};

/// POST /1/installation/new
///
/// Registers an installation once per machine. Responds with the machine id.
pub async fn new_installation(
    store: RequestStore,
    StrictForm { value: form, .. }: StrictForm<NewInstallationForm>,
) -> Result<String, ApiError> {
    let dosvox_info = Installation::parse_info(&form.dosvox_info)
        .map_err(|_| AppError::validation("Invalid JSON for dosvox_info"))?;
    let machine_info = Installation::parse_info(&form.machine_info)
        .map_err(|_| AppError::validation("Invalid JSON for machine_info"))?;

    let installation = Installation::new(
        form.machine_id,
        form.xmppvox_version,
        dosvox_info,
        machine_info,
    );

    store
        .insert_installation(&installation)
        .await
        .map_err(|e| {
            store.reject(
                e,
                format!("Failed to track install {}", installation.machine_id),
            )
        })?;

    info!(machine_id = %installation.machine_id, "Installation registered");
    Ok(format!("{}\n", installation.machine_id))
}
