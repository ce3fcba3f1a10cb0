use super::backend_client::{BackendClient, RemoteArea};
use crate::application::ports::Transcriber;
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Calls the backend's transcription function.
pub struct HttpTranscriber {
    client: BackendClient,
    function: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranscribeRequest<'a> {
    audio: &'a str,
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct TranscribeResponse {
    text: String,
}

impl HttpTranscriber {
    pub fn new(client: BackendClient, function: impl Into<String>) -> Self {
        Self {
            client,
            function: function.into(),
        }
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio_base64: &str, mime_type: &str) -> Result<String, AppError> {
        let builder = self
            .client
            .request(Method::POST, &format!("/functions/v1/{}", self.function))
            .json(&TranscribeRequest {
                audio: audio_base64,
                mime_type,
            });

        let response = self.client.send(builder, RemoteArea::Functions).await?;
        let body: TranscribeResponse = response.json().await.map_err(|err| {
            AppError::DeserializationError(format!("Invalid transcription response: {err}"))
        })?;
        Ok(body.text)
    }
}
