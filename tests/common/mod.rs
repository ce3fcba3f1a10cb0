#![allow(dead_code)]

pub mod fakes;

use chrono::Utc;
use fakes::{FixedIdentity, RecordingRecords, RecordingStorage, ScriptedTranscriber};
use fieldsync::application::ports::LocalQueueStore;
use fieldsync::domain::entities::offline::{
    NoteDraft, PhotoDraft, TimeClockDraft, VoiceNoteDraft,
};
use fieldsync::domain::value_objects::offline::{
    ClockAction, ProjectId, RemoteRecordId, TranscriptTarget, UserId,
};
use fieldsync::{AppConfig, AppState, RemoteServices, SqliteQueueStore};
use std::sync::Arc;

pub struct Harness {
    pub state: AppState,
    pub storage: Arc<RecordingStorage>,
    pub records: Arc<RecordingRecords>,
    pub transcriber: Arc<ScriptedTranscriber>,
}

pub fn harness() -> Harness {
    harness_with(AppConfig::default(), Arc::new(SqliteQueueStore::in_memory()))
}

pub fn harness_with(config: AppConfig, store: Arc<dyn LocalQueueStore>) -> Harness {
    let storage = Arc::new(RecordingStorage::default());
    let records = Arc::new(RecordingRecords::default());
    let transcriber = Arc::new(ScriptedTranscriber::new("Replace flashing"));

    let remote = RemoteServices {
        storage: storage.clone(),
        records: records.clone(),
        transcriber: transcriber.clone(),
        identity: Arc::new(FixedIdentity(Some(UserId::new("U1".into()).unwrap()))),
    };

    Harness {
        state: AppState::assemble(config, store, remote),
        storage,
        records,
        transcriber,
    }
}

pub fn photo_draft(project: &str, note: &str) -> PhotoDraft {
    PhotoDraft {
        project_id: ProjectId::new(project.into()).unwrap(),
        file: vec![0x5A; 10 * 1024],
        file_name: "roof.jpg".into(),
        content_type: Some("image/jpeg".into()),
        note: Some(note.into()),
        captured_at: Utc::now(),
    }
}

pub fn note_draft(content: &str) -> NoteDraft {
    NoteDraft {
        project_id: ProjectId::new("P1".into()).unwrap(),
        content: content.into(),
    }
}

pub fn clock_draft(entry: &str, action: ClockAction) -> TimeClockDraft {
    TimeClockDraft {
        entry_id: RemoteRecordId::new(entry.into()).unwrap(),
        user_id: UserId::new("U1".into()).unwrap(),
        action,
        clock_out_time: None,
        total_hours: None,
    }
}

pub fn voice_draft(photo: &str, target_field: TranscriptTarget) -> VoiceNoteDraft {
    VoiceNoteDraft {
        photo_id: RemoteRecordId::new(photo.into()).unwrap(),
        project_id: ProjectId::new("P1".into()).unwrap(),
        audio: b"fake-opus-frames".to_vec(),
        mime_type: Some("audio/webm".into()),
        target_field,
    }
}
