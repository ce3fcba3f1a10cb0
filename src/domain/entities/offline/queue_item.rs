use super::{
    NoteDraft, NoteQueueItem, PhotoDraft, PhotoQueueItem, QueueItemMeta, TimeClockDraft,
    TimeClockQueueItem, VoiceNoteDraft, VoiceNoteQueueItem,
};
use crate::domain::value_objects::offline::{QueueItemId, QueueKind, QueueStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Payload captured by the UI, one variant per queue.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueDraft {
    Photo(PhotoDraft),
    Note(NoteDraft),
    TimeClock(TimeClockDraft),
    VoiceNote(VoiceNoteDraft),
}

/// A persisted queue record, one variant per queue.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueItem {
    Photo(PhotoQueueItem),
    Note(NoteQueueItem),
    TimeClock(TimeClockQueueItem),
    VoiceNote(VoiceNoteQueueItem),
}

impl QueueDraft {
    pub fn kind(&self) -> QueueKind {
        match self {
            QueueDraft::Photo(_) => QueueKind::Photo,
            QueueDraft::Note(_) => QueueKind::Note,
            QueueDraft::TimeClock(_) => QueueKind::TimeClock,
            QueueDraft::VoiceNote(_) => QueueKind::VoiceNote,
        }
    }

    /// Rejects only payloads no remote operation could ever accept.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            QueueDraft::Photo(draft) if draft.file.is_empty() => {
                Err("Photo file cannot be empty".to_string())
            }
            QueueDraft::VoiceNote(draft) if draft.audio.is_empty() => {
                Err("Voice note audio cannot be empty".to_string())
            }
            QueueDraft::TimeClock(TimeClockDraft {
                total_hours: Some(hours),
                ..
            }) if !hours.is_finite() || *hours < 0.0 => Err(format!(
                "Total hours must be a non-negative number: {hours}"
            )),
            _ => Ok(()),
        }
    }

    pub fn into_item(self, id: QueueItemId, now: DateTime<Utc>) -> QueueItem {
        let meta = QueueItemMeta::new_pending(id, now);
        match self {
            QueueDraft::Photo(draft) => QueueItem::Photo(PhotoQueueItem::from_draft(meta, draft)),
            QueueDraft::Note(draft) => QueueItem::Note(NoteQueueItem::from_draft(meta, draft)),
            QueueDraft::TimeClock(draft) => {
                QueueItem::TimeClock(TimeClockQueueItem::from_draft(meta, draft))
            }
            QueueDraft::VoiceNote(draft) => {
                QueueItem::VoiceNote(VoiceNoteQueueItem::from_draft(meta, draft))
            }
        }
    }
}

impl QueueItem {
    pub fn kind(&self) -> QueueKind {
        match self {
            QueueItem::Photo(_) => QueueKind::Photo,
            QueueItem::Note(_) => QueueKind::Note,
            QueueItem::TimeClock(_) => QueueKind::TimeClock,
            QueueItem::VoiceNote(_) => QueueKind::VoiceNote,
        }
    }

    pub fn meta(&self) -> &QueueItemMeta {
        match self {
            QueueItem::Photo(item) => &item.meta,
            QueueItem::Note(item) => &item.meta,
            QueueItem::TimeClock(item) => &item.meta,
            QueueItem::VoiceNote(item) => &item.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut QueueItemMeta {
        match self {
            QueueItem::Photo(item) => &mut item.meta,
            QueueItem::Note(item) => &mut item.meta,
            QueueItem::TimeClock(item) => &mut item.meta,
            QueueItem::VoiceNote(item) => &mut item.meta,
        }
    }

    pub fn id(&self) -> &QueueItemId {
        &self.meta().id
    }

    pub fn status(&self) -> QueueStatus {
        self.meta().status
    }

    pub fn retry_count(&self) -> u32 {
        self.meta().retry_count
    }

    pub fn summary(&self) -> QueueItemSummary {
        let meta = self.meta();
        let kind = self.kind();
        let (reference, payload_bytes) = match self {
            QueueItem::Photo(item) => (item.project_id.to_string(), item.file.len()),
            QueueItem::Note(item) => (item.project_id.to_string(), item.content.len()),
            QueueItem::TimeClock(item) => {
                (format!("{}:{}", item.entry_id, item.action), 0)
            }
            QueueItem::VoiceNote(item) => {
                (format!("{}:{}", item.photo_id, item.target_field), item.audio.len())
            }
        };

        QueueItemSummary {
            id: meta.id.to_string(),
            kind,
            status: meta.status.label(kind).to_string(),
            retry_count: meta.retry_count,
            reference,
            payload_bytes,
            created_at: meta.created_at,
            updated_at: meta.updated_at,
            last_error: meta.last_error.clone(),
        }
    }
}

/// Flat view of a queue record for operator output; binary payloads are reduced to sizes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueueItemSummary {
    pub id: String,
    pub kind: QueueKind,
    pub status: String,
    pub retry_count: u32,
    pub reference: String,
    pub payload_bytes: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::offline::{ClockAction, ProjectId, RemoteRecordId, UserId};
    use chrono::SubsecRound;

    fn clock_draft(action: ClockAction, total_hours: Option<f64>) -> QueueDraft {
        QueueDraft::TimeClock(TimeClockDraft {
            entry_id: RemoteRecordId::new("E1".into()).unwrap(),
            user_id: UserId::new("U1".into()).unwrap(),
            action,
            clock_out_time: None,
            total_hours,
        })
    }

    #[test]
    fn negative_hours_are_rejected() {
        assert!(clock_draft(ClockAction::ClockOut, Some(-1.0)).validate().is_err());
        assert!(clock_draft(ClockAction::ClockOut, Some(f64::NAN)).validate().is_err());
        assert!(clock_draft(ClockAction::ClockOut, Some(7.5)).validate().is_ok());
    }

    #[test]
    fn captured_input_is_accepted_as_is() {
        // 休憩の送信では total_hours は使われない
        assert!(clock_draft(ClockAction::StartBreak, Some(1.0)).validate().is_ok());
        assert!(clock_draft(ClockAction::EndBreak, None).validate().is_ok());

        let blank_note = QueueDraft::Note(NoteDraft {
            project_id: ProjectId::new("P1".into()).unwrap(),
            content: "   ".into(),
        });
        assert!(blank_note.validate().is_ok());
    }

    #[test]
    fn into_item_assigns_pending_meta() {
        let now = Utc::now();
        let id = QueueItemId::generate();
        let item = clock_draft(ClockAction::ClockOut, None).into_item(id.clone(), now);

        assert_eq!(item.kind(), QueueKind::TimeClock);
        assert_eq!(item.id(), &id);
        assert_eq!(item.status(), QueueStatus::Pending);
        assert_eq!(item.retry_count(), 0);
        assert_eq!(item.meta().created_at, now.trunc_subsecs(3));
        assert_eq!(item.summary().status, "pending");
    }
}
