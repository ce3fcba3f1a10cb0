use crate::domain::value_objects::offline::{QueueKind, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::error::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Database max_connections must be greater than 0")]
    ZeroConnections,

    #[error("Sync remote_timeout_secs must be greater than 0")]
    ZeroRemoteTimeout,

    #[error("Sync max_backoff_ms ({max}) must not be lower than base_backoff_ms ({base})")]
    BackoffOrder { base: u64, max: u64 },

    #[error("Status poll_interval_secs must be greater than 0")]
    ZeroPollInterval,

    #[error("Backend base_url must start with http:// or https://: {0}")]
    InvalidBackendUrl(String),

    #[error("Unknown queue kind `{0}`")]
    UnknownQueueKind(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::ConfigurationError(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub backend: BackendConfig,
    pub status: StatusConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub remote_timeout_secs: u64,
    /// `None` keeps failed items eligible forever.
    pub max_attempts: Option<u32>,
    pub base_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub clear_completed_kinds: Vec<QueueKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub photo_bucket: String,
    pub photo_table: String,
    pub transcribe_function: String,
    pub health_path: String,
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    pub poll_interval_secs: u64,
    pub probe_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdentityConfig {
    pub user_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: default_database_url(),
                max_connections: 5,
                connection_timeout: 30,
            },
            sync: SyncConfig {
                auto_sync: true,
                remote_timeout_secs: 30,
                max_attempts: None,
                base_backoff_ms: 0,
                max_backoff_ms: 15 * 60 * 1000, // 15 minutes
                clear_completed_kinds: vec![QueueKind::Photo, QueueKind::VoiceNote],
            },
            backend: BackendConfig {
                base_url: "http://localhost:54321".to_string(),
                api_key: None,
                access_token: None,
                photo_bucket: "project-photos".to_string(),
                photo_table: "project_photos".to_string(),
                transcribe_function: "transcribe-audio".to_string(),
                health_path: "/auth/v1/health".to_string(),
                request_timeout: 30,
            },
            status: StatusConfig {
                poll_interval_secs: 5,
                probe_interval_secs: 15,
            },
            identity: IdentityConfig::default(),
        }
    }
}

impl SyncConfig {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// How long an item may stay in progress before a drain treats it as interrupted.
    /// A photo makes up to three bounded remote calls, so this leaves one timeout spare.
    pub fn interrupted_after(&self) -> Duration {
        self.remote_timeout().saturating_mul(4)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
    }
}

impl StatusConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 環境変数の読み出し元を差し替えられるようにしたもの（テスト用）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("FIELDSYNC_DATABASE_URL") {
            cfg.database.url = v;
        }
        if let Some(v) = lookup("FIELDSYNC_DB_MAX_CONNECTIONS")
            && let Some(value) = parse_u64(&v)
        {
            cfg.database.max_connections = value.min(u64::from(u32::MAX)) as u32;
        }

        if let Some(v) = lookup("FIELDSYNC_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Some(v) = lookup("FIELDSYNC_REMOTE_TIMEOUT_SECS")
            && let Some(value) = parse_u64(&v)
        {
            cfg.sync.remote_timeout_secs = value;
        }
        if let Some(v) = lookup("FIELDSYNC_MAX_ATTEMPTS")
            && let Some(value) = parse_u64(&v)
        {
            // 0 は「上限なし」
            cfg.sync.max_attempts = if value == 0 {
                None
            } else {
                Some(value.min(u64::from(u32::MAX)) as u32)
            };
        }
        if let Some(v) = lookup("FIELDSYNC_BASE_BACKOFF_MS")
            && let Some(value) = parse_u64(&v)
        {
            cfg.sync.base_backoff_ms = value;
        }
        if let Some(v) = lookup("FIELDSYNC_MAX_BACKOFF_MS")
            && let Some(value) = parse_u64(&v)
        {
            cfg.sync.max_backoff_ms = value;
        }
        if let Some(v) = lookup("FIELDSYNC_CLEAR_COMPLETED") {
            cfg.sync.clear_completed_kinds = parse_kinds(&v)?;
        }

        if let Some(v) = lookup("FIELDSYNC_BACKEND_URL") {
            cfg.backend.base_url = v.trim_end_matches('/').to_string();
        }
        cfg.backend.api_key = lookup("FIELDSYNC_API_KEY").filter(|v| !v.trim().is_empty());
        cfg.backend.access_token =
            lookup("FIELDSYNC_ACCESS_TOKEN").filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup("FIELDSYNC_PHOTO_BUCKET") {
            cfg.backend.photo_bucket = v;
        }
        if let Some(v) = lookup("FIELDSYNC_PHOTO_TABLE") {
            cfg.backend.photo_table = v;
        }
        if let Some(v) = lookup("FIELDSYNC_TRANSCRIBE_FUNCTION") {
            cfg.backend.transcribe_function = v;
        }
        if let Some(v) = lookup("FIELDSYNC_REQUEST_TIMEOUT_SECS")
            && let Some(value) = parse_u64(&v)
        {
            cfg.backend.request_timeout = value.max(1);
        }

        if let Some(v) = lookup("FIELDSYNC_STATUS_POLL_SECS")
            && let Some(value) = parse_u64(&v)
        {
            cfg.status.poll_interval_secs = value;
        }
        if let Some(v) = lookup("FIELDSYNC_PROBE_INTERVAL_SECS")
            && let Some(value) = parse_u64(&v)
        {
            cfg.status.probe_interval_secs = value.max(1);
        }

        cfg.identity.user_id = lookup("FIELDSYNC_USER_ID").filter(|v| !v.trim().is_empty());

        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::ZeroConnections);
        }
        if self.sync.remote_timeout_secs == 0 {
            return Err(ConfigError::ZeroRemoteTimeout);
        }
        if self.sync.max_backoff_ms < self.sync.base_backoff_ms {
            return Err(ConfigError::BackoffOrder {
                base: self.sync.base_backoff_ms,
                max: self.sync.max_backoff_ms,
            });
        }
        if self.status.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if !(self.backend.base_url.starts_with("http://")
            || self.backend.base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidBackendUrl(
                self.backend.base_url.clone(),
            ));
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    let dir = dirs::data_local_dir()
        .map(|dir| dir.join("fieldsync"))
        .unwrap_or_else(|| PathBuf::from("./data"));
    format!("sqlite:{}?mode=rwc", dir.join("offline_queue.db").display())
}

fn parse_kinds(value: &str) -> Result<Vec<QueueKind>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<QueueKind>().map_err(|_| ConfigError::UnknownQueueKind(s.into())))
        .collect()
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
