use crate::domain::entities::offline::DrainTrigger;
use crate::domain::value_objects::offline::QueueKind;
use serde::Serialize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcomeStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcomeMetadata {
    pub kind: Option<QueueKind>,
    pub item_id: Option<String>,
    pub trigger: Option<DrainTrigger>,
    pub retry_count: Option<u32>,
    pub duration_ms: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetricsSnapshot {
    pub total_success: u64,
    pub total_failure: u64,
    pub consecutive_failure: u64,
    pub last_success_ms: Option<u64>,
    pub last_failure_ms: Option<u64>,
    pub last_outcome: Option<SyncOutcomeStatus>,
    pub last_kind: Option<QueueKind>,
    pub last_item_id: Option<String>,
    pub last_trigger: Option<DrainTrigger>,
    pub last_retry_count: Option<u32>,
    pub last_duration_ms: Option<u64>,
    pub last_error: Option<String>,
}

#[derive(Default, Clone)]
struct LastOutcome {
    status: Option<SyncOutcomeStatus>,
    metadata: SyncOutcomeMetadata,
}

/// Per-item reconciliation counters. Owned by the reconciliation service and shared
/// through `Arc` with whoever needs a snapshot.
pub struct SyncMetrics {
    success: AtomicU64,
    failure: AtomicU64,
    consecutive_failure: AtomicU64,
    last_success_ms: AtomicU64,
    last_failure_ms: AtomicU64,
    last: Mutex<LastOutcome>,
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self {
            success: AtomicU64::new(0),
            failure: AtomicU64::new(0),
            consecutive_failure: AtomicU64::new(0),
            last_success_ms: AtomicU64::new(0),
            last_failure_ms: AtomicU64::new(0),
            last: Mutex::new(LastOutcome::default()),
        }
    }

    pub fn record(&self, status: SyncOutcomeStatus, metadata: SyncOutcomeMetadata) {
        match status {
            SyncOutcomeStatus::Success => {
                self.success.fetch_add(1, Ordering::Relaxed);
                self.last_success_ms
                    .store(current_unix_ms(), Ordering::Relaxed);
                self.consecutive_failure.store(0, Ordering::Relaxed);
            }
            SyncOutcomeStatus::Failure => {
                self.failure.fetch_add(1, Ordering::Relaxed);
                self.last_failure_ms
                    .store(current_unix_ms(), Ordering::Relaxed);
                self.consecutive_failure.fetch_add(1, Ordering::Relaxed);
            }
        }

        if let Ok(mut guard) = self.last.lock() {
            guard.status = Some(status);
            guard.metadata = metadata;
        }
    }

    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        let last = self
            .last
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();

        SyncMetricsSnapshot {
            total_success: self.success.load(Ordering::Relaxed),
            total_failure: self.failure.load(Ordering::Relaxed),
            consecutive_failure: self.consecutive_failure.load(Ordering::Relaxed),
            last_success_ms: to_option(self.last_success_ms.load(Ordering::Relaxed)),
            last_failure_ms: to_option(self.last_failure_ms.load(Ordering::Relaxed)),
            last_outcome: last.status,
            last_kind: last.metadata.kind,
            last_item_id: last.metadata.item_id,
            last_trigger: last.metadata.trigger,
            last_retry_count: last.metadata.retry_count,
            last_duration_ms: last.metadata.duration_ms,
            last_error: last.metadata.error,
        }
    }
}

fn to_option(value: u64) -> Option<u64> {
    if value == 0 { None } else { Some(value) }
}

fn current_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}
