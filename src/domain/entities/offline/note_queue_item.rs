use super::QueueItemMeta;
use crate::domain::value_objects::offline::ProjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub project_id: ProjectId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQueueItem {
    pub meta: QueueItemMeta,
    pub project_id: ProjectId,
    pub content: String,
}

impl NoteQueueItem {
    pub fn from_draft(meta: QueueItemMeta, draft: NoteDraft) -> Self {
        Self {
            meta,
            project_id: draft.project_id,
            content: draft.content,
        }
    }
}
