use crate::shared::config::BackendConfig;
use crate::shared::error::AppError;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Which kind of remote call failed, so the error lands in the right `AppError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteArea {
    Storage,
    Records,
    Functions,
}

/// Thin `reqwest` wrapper that carries the backend's base URL and auth headers.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key);
        }
        // ユーザートークンが無ければ匿名キーで認証する
        if let Some(token) = self.access_token.as_ref().or(self.api_key.as_ref()) {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Sends the request and turns any non-2xx answer into an error.
    pub async fn send(&self, builder: RequestBuilder, area: RemoteArea) -> Result<Response, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body, area))
    }
}

pub fn status_error(status: StatusCode, body: &str, area: RemoteArea) -> AppError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{status}: {}", body.trim())
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AppError::Timeout(detail),
        _ => match area {
            RemoteArea::Storage => AppError::Storage(detail),
            RemoteArea::Records | RemoteArea::Functions => AppError::Remote(detail),
        },
    }
}
