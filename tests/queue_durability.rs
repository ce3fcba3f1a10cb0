mod common;

use chrono::Utc;
use common::{clock_draft, harness_with, photo_draft, voice_draft};
use fieldsync::application::ports::LocalQueueStore;
use fieldsync::domain::entities::offline::{DrainTrigger, QueueItem};
use fieldsync::domain::value_objects::offline::{ClockAction, TranscriptTarget};
use fieldsync::shared::config::DatabaseConfig;
use fieldsync::{AppConfig, QueueKind, QueueManager, QueueStatus, SqliteQueueStore};
use std::path::Path;
use std::sync::Arc;

fn file_store(dir: &Path) -> Arc<SqliteQueueStore> {
    Arc::new(SqliteQueueStore::new(&DatabaseConfig {
        url: format!("sqlite:{}/offline_queue.db?mode=rwc", dir.display()),
        max_connections: 2,
        connection_timeout: 5,
    }))
}

#[tokio::test]
async fn queued_items_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    let (photo_id, voice_id) = {
        let store = file_store(dir.path());
        let h = harness_with(AppConfig::default(), store.clone());
        let photo_id = h
            .state
            .queue
            .enqueue_photo(photo_draft("P9", "north elevation"))
            .await
            .unwrap();
        let voice_id = h
            .state
            .queue
            .enqueue_voice_note(voice_draft("PH9", TranscriptTarget::Notes))
            .await
            .unwrap();
        store.close().await;
        (photo_id, voice_id)
    };

    let store = file_store(dir.path());
    let h = harness_with(AppConfig::default(), store);

    let Some(QueueItem::Photo(photo)) = h
        .state
        .queue
        .get(QueueKind::Photo, &photo_id)
        .await
        .unwrap()
    else {
        panic!("photo missing after restart");
    };
    assert_eq!(photo.project_id.as_str(), "P9");
    assert_eq!(photo.file.len(), 10 * 1024);
    assert_eq!(photo.note.as_deref(), Some("north elevation"));

    let Some(QueueItem::VoiceNote(voice)) = h
        .state
        .queue
        .get(QueueKind::VoiceNote, &voice_id)
        .await
        .unwrap()
    else {
        panic!("voice note missing after restart");
    };
    assert_eq!(voice.audio, b"fake-opus-frames".to_vec());

    let counts = h.state.queue.get_counts().await.unwrap();
    assert_eq!(counts.photos, 1);
    assert_eq!(counts.voice_notes, 1);
    assert_eq!(counts.total, 2);
}

#[tokio::test]
async fn item_interrupted_by_shutdown_is_retried_after_restart() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let store = file_store(dir.path());
        let h = harness_with(AppConfig::default(), store.clone());
        let id = h
            .state
            .queue
            .enqueue_time_clock(clock_draft("E1", ClockAction::ClockOut))
            .await
            .unwrap();
        // 一時間前、送信途中でプロセスが終了した状態を再現する
        let mut item = store.get(QueueKind::TimeClock, &id).await.unwrap().unwrap();
        let crashed_at = Utc::now() - chrono::Duration::hours(1);
        item.meta_mut()
            .transition(QueueStatus::InProgress, None, crashed_at)
            .unwrap();
        store.put(&item).await.unwrap();
        store.close().await;
        id
    };

    let store = file_store(dir.path());
    let h = harness_with(AppConfig::default(), store);
    assert!(
        h.state
            .queue
            .list_pending(QueueKind::TimeClock)
            .await
            .unwrap()
            .is_empty()
    );

    let report = h.state.reconciler.drain_all(DrainTrigger::AppStart).await;
    assert_eq!(report.recovered, 1);

    let item = h
        .state
        .queue
        .get(QueueKind::TimeClock, &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.status(), QueueStatus::Completed);
    assert_eq!(h.records.writes().len(), 1);
}

#[tokio::test]
async fn fresh_in_progress_item_is_not_taken_over_by_another_process() {
    let dir = tempfile::tempdir().unwrap();

    let running = harness_with(AppConfig::default(), file_store(dir.path()));
    let id = running
        .state
        .queue
        .enqueue_time_clock(clock_draft("E2", ClockAction::ClockOut))
        .await
        .unwrap();
    running
        .state
        .queue
        .update_status(QueueKind::TimeClock, &id, QueueStatus::InProgress, None)
        .await
        .unwrap();

    let other = harness_with(AppConfig::default(), file_store(dir.path()));
    let report = other.state.reconciler.drain_all(DrainTrigger::Manual).await;

    assert_eq!(report.recovered, 0);
    assert_eq!(report.completed(), 0);
    assert!(other.records.writes().is_empty());
    let item = other
        .state
        .queue
        .get(QueueKind::TimeClock, &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.status(), QueueStatus::InProgress);
}
