use super::driver::RemoteServices;
use crate::domain::entities::offline::NoteQueueItem;
use crate::shared::error::AppError;

/// The backend has no endpoint for field notes yet; drains leave note items queued.
pub(super) const HAS_REMOTE_OPERATION: bool = false;

pub(super) async fn reconcile(
    _remote: &RemoteServices,
    item: &NoteQueueItem,
) -> Result<(), AppError> {
    tracing::debug!(
        target: "offline::sync",
        id = %item.meta.id,
        project_id = %item.project_id,
        "note reconciliation is not wired to a remote operation"
    );
    Ok(())
}
