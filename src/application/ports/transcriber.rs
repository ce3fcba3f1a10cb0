use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_base64: &str, mime_type: &str) -> Result<String, AppError>;
}
