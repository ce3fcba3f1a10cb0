use super::QueueItemMeta;
use crate::domain::value_objects::offline::ProjectId;
use chrono::{DateTime, SubsecRound, Utc};

const FALLBACK_EXTENSION: &str = "jpg";

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoDraft {
    pub project_id: ProjectId,
    pub file: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
    pub note: Option<String>,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoQueueItem {
    pub meta: QueueItemMeta,
    pub project_id: ProjectId,
    pub file: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
    pub note: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl PhotoQueueItem {
    pub fn from_draft(meta: QueueItemMeta, draft: PhotoDraft) -> Self {
        Self {
            meta,
            project_id: draft.project_id,
            file: draft.file,
            file_name: draft.file_name,
            content_type: draft.content_type,
            note: draft.note,
            captured_at: draft.captured_at.trunc_subsecs(3),
        }
    }

    /// Lower-cased extension of the original file name.
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::offline::QueueItemId;

    fn item_named(file_name: &str) -> PhotoQueueItem {
        PhotoQueueItem::from_draft(
            QueueItemMeta::new_pending(QueueItemId::generate(), Utc::now()),
            PhotoDraft {
                project_id: ProjectId::new("P1".into()).unwrap(),
                file: vec![1, 2, 3],
                file_name: file_name.to_string(),
                content_type: None,
                note: None,
                captured_at: Utc::now(),
            },
        )
    }

    #[test]
    fn extension_comes_from_file_name() {
        assert_eq!(item_named("ridge.HEIC").extension(), "heic");
        assert_eq!(item_named("a.b.png").extension(), "png");
    }

    #[test]
    fn missing_extension_falls_back() {
        assert_eq!(item_named("capture").extension(), "jpg");
        assert_eq!(item_named("capture.").extension(), "jpg");
        assert_eq!(item_named("weird.p/g").extension(), "jpg");
    }
}
