use super::rows::{NoteQueueRow, PhotoQueueRow, TimeClockQueueRow, VoiceNoteQueueRow};
use crate::domain::entities::offline::{
    NoteQueueItem, PhotoQueueItem, QueueItem, QueueItemMeta, TimeClockQueueItem,
    VoiceNoteQueueItem,
};
use crate::domain::value_objects::offline::{
    ProjectId, QueueItemId, QueueStatus, RemoteRecordId, UserId,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};

pub fn millis_to_datetime(value: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(value).ok_or_else(|| {
        AppError::DeserializationError(format!("Invalid timestamp millis: {value}"))
    })
}

fn invalid(err: String) -> AppError {
    AppError::DeserializationError(err)
}

fn meta_from_columns(
    id: String,
    status: &str,
    retry_count: i64,
    created_at: i64,
    updated_at: i64,
    last_error: Option<String>,
) -> Result<QueueItemMeta, AppError> {
    Ok(QueueItemMeta {
        id: QueueItemId::new(id).map_err(invalid)?,
        status: QueueStatus::parse(status).map_err(invalid)?,
        retry_count: u32::try_from(retry_count.max(0)).unwrap_or(u32::MAX),
        created_at: millis_to_datetime(created_at)?,
        updated_at: millis_to_datetime(updated_at)?,
        last_error,
    })
}

pub fn photo_from_row(row: PhotoQueueRow) -> Result<QueueItem, AppError> {
    let meta = meta_from_columns(
        row.id,
        &row.status,
        row.retry_count,
        row.created_at,
        row.updated_at,
        row.last_error,
    )?;

    Ok(QueueItem::Photo(PhotoQueueItem {
        meta,
        project_id: ProjectId::new(row.project_id).map_err(invalid)?,
        file: row.file,
        file_name: row.file_name,
        content_type: row.content_type,
        note: row.note,
        captured_at: millis_to_datetime(row.captured_at)?,
    }))
}

pub fn note_from_row(row: NoteQueueRow) -> Result<QueueItem, AppError> {
    let meta = meta_from_columns(
        row.id,
        &row.status,
        row.retry_count,
        row.created_at,
        row.updated_at,
        row.last_error,
    )?;

    Ok(QueueItem::Note(NoteQueueItem {
        meta,
        project_id: ProjectId::new(row.project_id).map_err(invalid)?,
        content: row.content,
    }))
}

pub fn time_clock_from_row(row: TimeClockQueueRow) -> Result<QueueItem, AppError> {
    let meta = meta_from_columns(
        row.id,
        &row.status,
        row.retry_count,
        row.created_at,
        row.updated_at,
        row.last_error,
    )?;

    Ok(QueueItem::TimeClock(TimeClockQueueItem {
        meta,
        entry_id: RemoteRecordId::new(row.entry_id).map_err(invalid)?,
        user_id: UserId::new(row.user_id).map_err(invalid)?,
        action: row.action.parse().map_err(invalid)?,
        clock_out_time: row.clock_out_time.map(millis_to_datetime).transpose()?,
        total_hours: row.total_hours,
    }))
}

pub fn voice_note_from_row(row: VoiceNoteQueueRow) -> Result<QueueItem, AppError> {
    let meta = meta_from_columns(
        row.id,
        &row.status,
        row.retry_count,
        row.created_at,
        row.updated_at,
        row.last_error,
    )?;

    Ok(QueueItem::VoiceNote(VoiceNoteQueueItem {
        meta,
        photo_id: RemoteRecordId::new(row.photo_id).map_err(invalid)?,
        project_id: ProjectId::new(row.project_id).map_err(invalid)?,
        audio: row.audio,
        mime_type: row.mime_type,
        target_field: row.target_field.parse().map_err(invalid)?,
    }))
}
