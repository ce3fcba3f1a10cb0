use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Uploads `bytes` to `path` and returns the stored path.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, AppError>;
    fn public_url(&self, path: &str) -> String;
    async fn remove(&self, paths: &[String]) -> Result<(), AppError>;
}
