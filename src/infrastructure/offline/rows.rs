use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PhotoQueueRow {
    pub id: String,
    pub project_id: String,
    pub file: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
    pub note: Option<String>,
    pub captured_at: i64,
    pub status: String,
    pub retry_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct NoteQueueRow {
    pub id: String,
    pub project_id: String,
    pub content: String,
    pub status: String,
    pub retry_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TimeClockQueueRow {
    pub id: String,
    pub entry_id: String,
    pub user_id: String,
    pub action: String,
    pub clock_out_time: Option<i64>,
    pub total_hours: Option<f64>,
    pub status: String,
    pub retry_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct VoiceNoteQueueRow {
    pub id: String,
    pub photo_id: String,
    pub project_id: String,
    pub audio: Vec<u8>,
    pub mime_type: String,
    pub target_field: String,
    pub status: String,
    pub retry_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_error: Option<String>,
}
