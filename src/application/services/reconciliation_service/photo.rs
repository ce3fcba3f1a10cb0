use super::driver::{ReconciliationSettings, RemoteServices, within};
use crate::domain::entities::offline::PhotoQueueItem;
use crate::domain::value_objects::offline::ProjectId;
use crate::shared::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::json;

const PATH_SUFFIX_LEN: usize = 6;

/// `{project_id}/{timestamp_ms}-{random}.{ext}` so repeated uploads of one item never collide.
pub fn storage_path(project_id: &ProjectId, extension: &str, now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PATH_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!(
        "{}/{}-{}.{}",
        project_id.as_str(),
        now.timestamp_millis(),
        suffix,
        extension
    )
}

pub(super) async fn reconcile(
    remote: &RemoteServices,
    settings: &ReconciliationSettings,
    item: &PhotoQueueItem,
) -> Result<(), AppError> {
    let uploaded_by = remote
        .identity
        .current_user_id()
        .ok_or_else(|| AppError::Auth("No signed-in user to attribute the photo to".into()))?;

    let path = storage_path(&item.project_id, &item.extension(), Utc::now());
    let stored_path = within(
        settings.remote_timeout,
        "photo upload",
        remote
            .storage
            .upload(&path, item.file.clone(), item.content_type.as_deref()),
    )
    .await?;
    let photo_url = remote.storage.public_url(&stored_path);

    let record = json!({
        "project_id": item.project_id.as_str(),
        "photo_url": photo_url,
        "storage_path": stored_path,
        "caption": item.note,
        "captured_at": item.captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "uploaded_by": uploaded_by.as_str(),
    });

    let inserted = within(
        settings.remote_timeout,
        "photo metadata insert",
        remote.records.insert(&settings.photo_table, record),
    )
    .await;

    if let Err(err) = inserted {
        // メタデータが無いオブジェクトは孤立するので削除する
        let removal = within(
            settings.remote_timeout,
            "orphaned photo removal",
            remote.storage.remove(std::slice::from_ref(&stored_path)),
        )
        .await;
        if let Err(remove_err) = removal {
            tracing::warn!(
                target: "offline::sync",
                path = %stored_path,
                error = %remove_err,
                "failed to remove orphaned photo object"
            );
        }
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_path_is_scoped_to_project() {
        let project = ProjectId::new("P1".into()).unwrap();
        let now = DateTime::parse_from_rfc3339("2026-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let path = storage_path(&project, "jpg", now);
        let (dir, file) = path.split_once('/').unwrap();
        assert_eq!(dir, "P1");

        let (stem, ext) = file.rsplit_once('.').unwrap();
        assert_eq!(ext, "jpg");
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert_eq!(millis, now.timestamp_millis().to_string());
        assert_eq!(suffix.len(), PATH_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn storage_paths_differ_between_calls() {
        let project = ProjectId::new("P1".into()).unwrap();
        let now = Utc::now();
        assert_ne!(
            storage_path(&project, "png", now),
            storage_path(&project, "png", now)
        );
    }
}
