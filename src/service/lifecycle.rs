//! Project lifecycle: the create/view/delete orchestration over the
//! repository and the asset store.
//!
//! Ordering invariants:
//! - save is store-then-insert, and a failed insert removes the freshly
//!   stored asset, so neither a row without an asset nor a stray asset
//!   without a row survives a failed save
//! - delete is destroy-then-delete, and a failed destroy aborts with the
//!   row intact rather than silently orphaning a remote asset

use tracing::{debug, info, warn};

use crate::db::{Project, ProjectKind, ProjectStore};
use crate::error::AppError;
use crate::middleware::gate::Gate;
use crate::storage::AssetStore;

pub async fn save_project(
    _gate: Gate,
    db: &ProjectStore,
    assets: &AssetStore,
    name: &str,
    kind: ProjectKind,
    file_name: &str,
    bytes: &[u8],
) -> Result<Project, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("project name is required".to_string()));
    }
    if file_name.is_empty() || bytes.is_empty() {
        return Err(AppError::Validation("no file uploaded".to_string()));
    }

    let stored = assets.store(bytes, file_name, kind.into()).await?;

    match db
        .insert(name, kind, &stored.reference, stored.external_id.as_deref())
        .await
    {
        Ok(project) => {
            info!(id = project.id, name, kind = kind.as_str(), "project created");
            Ok(project)
        }
        Err(e) => {
            warn!(
                reference = %stored.reference,
                error = %e,
                "insert failed after store; removing the asset"
            );
            if let Err(destroy_err) = assets
                .destroy(&stored.reference, stored.external_id.as_deref())
                .await
            {
                warn!(
                    reference = %stored.reference,
                    error = %destroy_err,
                    "could not remove asset after failed insert"
                );
            }
            Err(e)
        }
    }
}

pub async fn delete_project(
    _gate: Gate,
    db: &ProjectStore,
    assets: &AssetStore,
    id: i64,
) -> Result<(), AppError> {
    let Some(project) = db.get(id).await? else {
        return Err(AppError::NotFound);
    };

    // Asset first: a destroy failure leaves the row (and the dashboard entry)
    // intact so the problem is visible instead of orphaning the asset.
    assets
        .destroy(&project.file_ref, project.external_id.as_deref())
        .await?;

    if !db.delete(id).await? {
        debug!(id, "row already deleted concurrently");
    }
    info!(id, name = %project.name, "project deleted");
    Ok(())
}

/// Fetch a project for a viewer page. A kind mismatch is NotFound: the
/// image viewer never renders a model project and vice versa.
pub async fn viewer_project(
    db: &ProjectStore,
    id: i64,
    expected: ProjectKind,
) -> Result<Project, AppError> {
    match db.get(id).await? {
        Some(project) if project.kind == expected => Ok(project),
        _ => Err(AppError::NotFound),
    }
}
