use super::driver::{ReconciliationSettings, RemoteServices, within};
use crate::application::ports::RecordFilter;
use crate::domain::entities::offline::VoiceNoteQueueItem;
use crate::shared::error::AppError;
use base64::{Engine as _, engine::general_purpose};
use serde_json::{Map, Value};

pub(super) async fn reconcile(
    remote: &RemoteServices,
    settings: &ReconciliationSettings,
    item: &VoiceNoteQueueItem,
) -> Result<(), AppError> {
    let audio_base64 = general_purpose::STANDARD.encode(&item.audio);

    let transcript = within(
        settings.remote_timeout,
        "transcription",
        remote.transcriber.transcribe(&audio_base64, &item.mime_type),
    )
    .await?;

    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(AppError::Remote("Transcription returned no text".into()));
    }

    // 対象カラムだけを更新する。もう一方のカラムには触れない
    let mut patch = Map::new();
    patch.insert(
        item.target_field.column().to_string(),
        Value::String(transcript.to_string()),
    );

    within(
        settings.remote_timeout,
        "photo transcript patch",
        remote.records.update(
            &settings.photo_table,
            RecordFilter::new().eq("id", item.photo_id.as_str()),
            Value::Object(patch),
        ),
    )
    .await
}
