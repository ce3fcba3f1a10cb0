use crate::domain::value_objects::offline::{QueueItemId, QueueStatus};
use chrono::{DateTime, SubsecRound, Utc};

/// System-assigned bookkeeping shared by every queue record.
///
/// Timestamps are kept at millisecond precision, the resolution of the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItemMeta {
    pub id: QueueItemId,
    pub status: QueueStatus,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

impl QueueItemMeta {
    pub fn new_pending(id: QueueItemId, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            id,
            status: QueueStatus::Pending,
            retry_count: 0,
            created_at: now,
            updated_at: now,
            last_error: None,
        }
    }

    /// Moves to `next`. Recording a failure bumps `retry_count` in the same step.
    pub fn transition(
        &mut self,
        next: QueueStatus,
        error: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "item {} is {} and cannot move to {}",
                self.id, self.status, next
            ));
        }

        if next == QueueStatus::Failed {
            self.retry_count = self.retry_count.saturating_add(1);
            self.last_error = error;
        } else if next == QueueStatus::Completed {
            self.last_error = None;
        }

        self.status = next;
        self.updated_at = now.trunc_subsecs(3);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_increments_retry_count() {
        let now = Utc::now();
        let mut meta = QueueItemMeta::new_pending(QueueItemId::generate(), now);

        meta.transition(QueueStatus::InProgress, None, now).unwrap();
        meta.transition(QueueStatus::Failed, Some("boom".into()), now)
            .unwrap();
        assert_eq!(meta.retry_count, 1);
        assert_eq!(meta.last_error.as_deref(), Some("boom"));

        meta.transition(QueueStatus::InProgress, None, now).unwrap();
        meta.transition(QueueStatus::Failed, None, now).unwrap();
        assert_eq!(meta.retry_count, 2);
    }

    #[test]
    fn completed_rejects_further_processing() {
        let now = Utc::now();
        let mut meta = QueueItemMeta::new_pending(QueueItemId::generate(), now);
        meta.transition(QueueStatus::InProgress, None, now).unwrap();
        meta.transition(QueueStatus::Completed, None, now).unwrap();

        assert!(meta.transition(QueueStatus::InProgress, None, now).is_err());
        assert_eq!(meta.status, QueueStatus::Completed);
    }

    #[test]
    fn failure_without_attempt_keeps_retry_count() {
        let now = Utc::now();
        let mut meta = QueueItemMeta::new_pending(QueueItemId::generate(), now);

        assert!(meta.transition(QueueStatus::Failed, Some("boom".into()), now).is_err());
        assert_eq!(meta.status, QueueStatus::Pending);
        assert_eq!(meta.retry_count, 0);
        assert!(meta.last_error.is_none());
    }
}
