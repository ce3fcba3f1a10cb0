use super::connectivity::ConnectivitySignal;
use crate::shared::config::BackendConfig;
use crate::shared::error::AppError;
use std::time::Duration;
use tokio::sync::watch;

/// Feeds [`ConnectivitySignal`] by polling the backend's health endpoint.
///
/// Any HTTP response counts as online, including auth or server errors; only a
/// transport failure or timeout counts as offline.
pub struct HttpConnectivityProbe {
    client: reqwest::Client,
    url: String,
    interval: Duration,
}

impl HttpConnectivityProbe {
    pub fn new(url: impl Into<String>, timeout: Duration, interval: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            interval,
        })
    }

    pub fn from_config(backend: &BackendConfig, interval: Duration) -> Result<Self, AppError> {
        let url = format!(
            "{}{}",
            backend.base_url.trim_end_matches('/'),
            backend.health_path
        );
        Self::new(url, Duration::from_secs(backend.request_timeout), interval)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn check(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(resp) => {
                tracing::trace!(
                    target: "offline::connectivity",
                    status = resp.status().as_u16(),
                    "health probe answered"
                );
                true
            }
            Err(err) => {
                tracing::debug!(
                    target: "offline::connectivity",
                    error = %err,
                    "health probe unreachable"
                );
                false
            }
        }
    }

    pub async fn run(self, signal: ConnectivitySignal, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let online = self.check().await;
                    signal.set_online(online);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}
