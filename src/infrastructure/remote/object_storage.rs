use super::backend_client::{BackendClient, RemoteArea};
use crate::application::ports::ObjectStorage;
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

/// Bucket storage over the backend's `/storage/v1` REST API.
pub struct HttpObjectStorage {
    client: BackendClient,
    bucket: String,
}

impl HttpObjectStorage {
    pub fn new(client: BackendClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, AppError> {
        let builder = self
            .client
            .request(
                Method::POST,
                &format!("/storage/v1/object/{}/{}", self.bucket, path),
            )
            .header(
                reqwest::header::CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .header("x-upsert", "false")
            .body(bytes);

        self.client.send(builder, RemoteArea::Storage).await?;
        Ok(path.to_string())
    }

    fn public_url(&self, path: &str) -> String {
        self.client
            .url(&format!("/storage/v1/object/public/{}/{}", self.bucket, path))
    }

    async fn remove(&self, paths: &[String]) -> Result<(), AppError> {
        if paths.is_empty() {
            return Ok(());
        }
        let builder = self
            .client
            .request(Method::DELETE, &format!("/storage/v1/object/{}", self.bucket))
            .json(&json!({ "prefixes": paths }));

        self.client.send(builder, RemoteArea::Storage).await?;
        Ok(())
    }
}
