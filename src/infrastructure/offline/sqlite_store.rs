use super::mappers::{note_from_row, photo_from_row, time_clock_from_row, voice_note_from_row};
use super::rows::{NoteQueueRow, PhotoQueueRow, TimeClockQueueRow, VoiceNoteQueueRow};
use crate::application::ports::local_queue_store::LocalQueueStore;
use crate::domain::entities::offline::QueueItem;
use crate::domain::value_objects::offline::{QueueItemId, QueueKind, QueueStatus};
use crate::shared::config::DatabaseConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::query::QueryAs;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions,
};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const MEMORY_URL: &str = "sqlite::memory:";

/// SQLite-backed queue store. The database is opened lazily on first use; concurrent
/// first callers all await the same initialisation, and a failed open is retried on the
/// next call.
pub struct SqliteQueueStore {
    url: String,
    max_connections: u32,
    connect_timeout: Duration,
    pool: OnceCell<SqlitePool>,
}

impl SqliteQueueStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections.max(1),
            connect_timeout: Duration::from_secs(config.connection_timeout.max(1)),
            pool: OnceCell::new(),
        }
    }

    /// Single-connection in-memory store; the data lives as long as the store does.
    pub fn in_memory() -> Self {
        Self {
            url: MEMORY_URL.to_string(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            pool: OnceCell::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.pool.initialized()
    }

    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }

    async fn pool(&self) -> Result<&SqlitePool, AppError> {
        self.pool.get_or_try_init(|| self.connect()).await
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> AppError {
        AppError::LocalStorageUnavailable(format!("{}: {err}", self.url))
    }

    /// 状態で絞り込む場合は SQL 側で行うので、対象外の BLOB は読み込まない
    async fn select(
        &self,
        kind: QueueKind,
        statuses: Option<&[QueueStatus]>,
    ) -> Result<Vec<QueueItem>, AppError> {
        let pool = self.pool().await?;
        let labels: Vec<&'static str> = statuses
            .unwrap_or_default()
            .iter()
            .map(|status| status.label(kind))
            .collect();

        let filter = if labels.is_empty() {
            String::new()
        } else {
            let placeholders = (1..=labels.len())
                .map(|index| format!("?{index}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(" WHERE status IN ({placeholders})")
        };
        let sql = format!(
            "SELECT * FROM {}{filter} ORDER BY created_at ASC, rowid ASC",
            kind.table_name()
        );

        match kind {
            QueueKind::Photo => bind_labels(sqlx::query_as::<_, PhotoQueueRow>(&sql), &labels)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(photo_from_row)
                .collect(),
            QueueKind::Note => bind_labels(sqlx::query_as::<_, NoteQueueRow>(&sql), &labels)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(note_from_row)
                .collect(),
            QueueKind::TimeClock => {
                bind_labels(sqlx::query_as::<_, TimeClockQueueRow>(&sql), &labels)
                    .fetch_all(pool)
                    .await?
                    .into_iter()
                    .map(time_clock_from_row)
                    .collect()
            }
            QueueKind::VoiceNote => {
                bind_labels(sqlx::query_as::<_, VoiceNoteQueueRow>(&sql), &labels)
                    .fetch_all(pool)
                    .await?
                    .into_iter()
                    .map(voice_note_from_row)
                    .collect()
            }
        }
    }

    async fn connect(&self) -> Result<SqlitePool, AppError> {
        let options = SqliteConnectOptions::from_str(&self.url)
            .map_err(|err| self.unavailable(err))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.unavailable(err))?;
        }

        let in_memory = self.url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { self.max_connections })
            .acquire_timeout(self.connect_timeout);
        if in_memory {
            // 接続が閉じるとメモリDBの内容が消える
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|err| self.unavailable(err))?;
        MIGRATOR.run(&pool).await.map_err(|err| self.unavailable(err))?;

        tracing::info!(target: "offline::store", url = %self.url, "offline queue store opened");
        Ok(pool)
    }
}

fn bind_labels<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    labels: &[&'static str],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for label in labels {
        query = query.bind(*label);
    }
    query
}

#[async_trait]
impl LocalQueueStore for SqliteQueueStore {
    async fn open(&self) -> Result<(), AppError> {
        self.pool().await.map(|_| ())
    }

    async fn put(&self, item: &QueueItem) -> Result<(), AppError> {
        let pool = self.pool().await?;
        let kind = item.kind();
        let meta = item.meta();
        let status = meta.status.label(kind);
        let retry_count = i64::from(meta.retry_count);
        let created_at = meta.created_at.timestamp_millis();
        let updated_at = meta.updated_at.timestamp_millis();

        match item {
            QueueItem::Photo(photo) => {
                sqlx::query(
                    r#"
                    INSERT INTO photo_queue (
                        id, project_id, file, file_name, content_type, note, captured_at,
                        status, retry_count, created_at, updated_at, last_error
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                    ON CONFLICT(id) DO UPDATE SET
                        project_id = excluded.project_id,
                        file = excluded.file,
                        file_name = excluded.file_name,
                        content_type = excluded.content_type,
                        note = excluded.note,
                        captured_at = excluded.captured_at,
                        status = excluded.status,
                        retry_count = excluded.retry_count,
                        created_at = excluded.created_at,
                        updated_at = excluded.updated_at,
                        last_error = excluded.last_error
                    "#,
                )
                .bind(meta.id.as_str())
                .bind(photo.project_id.as_str())
                .bind(&photo.file)
                .bind(&photo.file_name)
                .bind(&photo.content_type)
                .bind(&photo.note)
                .bind(photo.captured_at.timestamp_millis())
                .bind(status)
                .bind(retry_count)
                .bind(created_at)
                .bind(updated_at)
                .bind(&meta.last_error)
                .execute(pool)
                .await?;
            }
            QueueItem::Note(note) => {
                sqlx::query(
                    r#"
                    INSERT INTO note_queue (
                        id, project_id, content, status, retry_count,
                        created_at, updated_at, last_error
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(id) DO UPDATE SET
                        project_id = excluded.project_id,
                        content = excluded.content,
                        status = excluded.status,
                        retry_count = excluded.retry_count,
                        created_at = excluded.created_at,
                        updated_at = excluded.updated_at,
                        last_error = excluded.last_error
                    "#,
                )
                .bind(meta.id.as_str())
                .bind(note.project_id.as_str())
                .bind(&note.content)
                .bind(status)
                .bind(retry_count)
                .bind(created_at)
                .bind(updated_at)
                .bind(&meta.last_error)
                .execute(pool)
                .await?;
            }
            QueueItem::TimeClock(entry) => {
                sqlx::query(
                    r#"
                    INSERT INTO time_clock_queue (
                        id, entry_id, user_id, action, clock_out_time, total_hours,
                        status, retry_count, created_at, updated_at, last_error
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                    ON CONFLICT(id) DO UPDATE SET
                        entry_id = excluded.entry_id,
                        user_id = excluded.user_id,
                        action = excluded.action,
                        clock_out_time = excluded.clock_out_time,
                        total_hours = excluded.total_hours,
                        status = excluded.status,
                        retry_count = excluded.retry_count,
                        created_at = excluded.created_at,
                        updated_at = excluded.updated_at,
                        last_error = excluded.last_error
                    "#,
                )
                .bind(meta.id.as_str())
                .bind(entry.entry_id.as_str())
                .bind(entry.user_id.as_str())
                .bind(entry.action.as_str())
                .bind(entry.clock_out_time.map(|t| t.timestamp_millis()))
                .bind(entry.total_hours)
                .bind(status)
                .bind(retry_count)
                .bind(created_at)
                .bind(updated_at)
                .bind(&meta.last_error)
                .execute(pool)
                .await?;
            }
            QueueItem::VoiceNote(voice) => {
                sqlx::query(
                    r#"
                    INSERT INTO voice_note_queue (
                        id, photo_id, project_id, audio, mime_type, target_field,
                        status, retry_count, created_at, updated_at, last_error
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                    ON CONFLICT(id) DO UPDATE SET
                        photo_id = excluded.photo_id,
                        project_id = excluded.project_id,
                        audio = excluded.audio,
                        mime_type = excluded.mime_type,
                        target_field = excluded.target_field,
                        status = excluded.status,
                        retry_count = excluded.retry_count,
                        created_at = excluded.created_at,
                        updated_at = excluded.updated_at,
                        last_error = excluded.last_error
                    "#,
                )
                .bind(meta.id.as_str())
                .bind(voice.photo_id.as_str())
                .bind(voice.project_id.as_str())
                .bind(&voice.audio)
                .bind(&voice.mime_type)
                .bind(voice.target_field.column())
                .bind(status)
                .bind(retry_count)
                .bind(created_at)
                .bind(updated_at)
                .bind(&meta.last_error)
                .execute(pool)
                .await?;
            }
        }

        Ok(())
    }

    async fn get_all(&self, kind: QueueKind) -> Result<Vec<QueueItem>, AppError> {
        self.select(kind, None).await
    }

    async fn get_by_status(
        &self,
        kind: QueueKind,
        statuses: &[QueueStatus],
    ) -> Result<Vec<QueueItem>, AppError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        self.select(kind, Some(statuses)).await
    }

    async fn get(&self, kind: QueueKind, id: &QueueItemId) -> Result<Option<QueueItem>, AppError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT * FROM {} WHERE id = ?1", kind.table_name());

        match kind {
            QueueKind::Photo => sqlx::query_as::<_, PhotoQueueRow>(&sql)
                .bind(id.as_str())
                .fetch_optional(pool)
                .await?
                .map(photo_from_row)
                .transpose(),
            QueueKind::Note => sqlx::query_as::<_, NoteQueueRow>(&sql)
                .bind(id.as_str())
                .fetch_optional(pool)
                .await?
                .map(note_from_row)
                .transpose(),
            QueueKind::TimeClock => sqlx::query_as::<_, TimeClockQueueRow>(&sql)
                .bind(id.as_str())
                .fetch_optional(pool)
                .await?
                .map(time_clock_from_row)
                .transpose(),
            QueueKind::VoiceNote => sqlx::query_as::<_, VoiceNoteQueueRow>(&sql)
                .bind(id.as_str())
                .fetch_optional(pool)
                .await?
                .map(voice_note_from_row)
                .transpose(),
        }
    }

    async fn delete(&self, kind: QueueKind, id: &QueueItemId) -> Result<bool, AppError> {
        let pool = self.pool().await?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table_name());
        let result = sqlx::query(&sql).bind(id.as_str()).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_status(
        &self,
        kind: QueueKind,
        status: QueueStatus,
    ) -> Result<u64, AppError> {
        let pool = self.pool().await?;
        let sql = format!("DELETE FROM {} WHERE status = ?1", kind.table_name());
        let result = sqlx::query(&sql)
            .bind(status.label(kind))
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_unfinished(&self, kind: QueueKind) -> Result<u64, AppError> {
        let pool = self.pool().await?;
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE status != ?1",
            kind.table_name()
        );
        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(QueueStatus::Completed.label(kind))
            .fetch_one(pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
