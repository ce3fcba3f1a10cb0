use super::QueueItemMeta;
use crate::domain::value_objects::offline::{ProjectId, RemoteRecordId, TranscriptTarget};

pub const DEFAULT_AUDIO_MIME: &str = "audio/webm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceNoteDraft {
    pub photo_id: RemoteRecordId,
    pub project_id: ProjectId,
    pub audio: Vec<u8>,
    pub mime_type: Option<String>,
    pub target_field: TranscriptTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceNoteQueueItem {
    pub meta: QueueItemMeta,
    pub photo_id: RemoteRecordId,
    pub project_id: ProjectId,
    pub audio: Vec<u8>,
    pub mime_type: String,
    pub target_field: TranscriptTarget,
}

impl VoiceNoteQueueItem {
    pub fn from_draft(meta: QueueItemMeta, draft: VoiceNoteDraft) -> Self {
        Self {
            meta,
            photo_id: draft.photo_id,
            project_id: draft.project_id,
            audio: draft.audio,
            mime_type: draft
                .mime_type
                .filter(|mime| !mime.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string()),
            target_field: draft.target_field,
        }
    }
}
