use super::QueueStatus;
use chrono::{DateTime, Utc};
use std::time::Duration;

const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Retry eligibility for failed queue items.
///
/// The default never gives up and never waits: a failed item is picked up again on the
/// very next drain. Setting `max_attempts` holds an item once it has failed that many
/// times; it then needs an explicit reset before it is drained again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    base_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: Option<u32>, base_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            base_backoff,
            max_backoff: max_backoff.max(base_backoff),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None, Duration::ZERO, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn backoff_for(&self, retry_count: u32) -> Duration {
        if retry_count == 0 || self.base_backoff.is_zero() {
            return Duration::ZERO;
        }
        let exp = (retry_count - 1).min(MAX_BACKOFF_EXPONENT);
        self.base_backoff
            .saturating_mul(1u32 << exp)
            .min(self.max_backoff)
    }

    pub fn is_exhausted(&self, retry_count: u32) -> bool {
        self.max_attempts
            .is_some_and(|max_attempts| retry_count >= max_attempts)
    }

    pub fn is_eligible(
        &self,
        status: QueueStatus,
        retry_count: u32,
        updated_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        match status {
            QueueStatus::Pending => true,
            QueueStatus::Failed => {
                if self.is_exhausted(retry_count) {
                    return false;
                }
                let backoff = chrono::Duration::from_std(self.backoff_for(retry_count))
                    .unwrap_or_else(|_| chrono::Duration::days(365));
                now >= updated_at + backoff
            }
            QueueStatus::InProgress | QueueStatus::Completed => false,
        }
    }
}
