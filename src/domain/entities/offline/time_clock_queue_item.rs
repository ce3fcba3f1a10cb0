use super::QueueItemMeta;
use crate::domain::value_objects::offline::{ClockAction, RemoteRecordId, UserId};
use chrono::{DateTime, SubsecRound, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct TimeClockDraft {
    pub entry_id: RemoteRecordId,
    pub user_id: UserId,
    pub action: ClockAction,
    pub clock_out_time: Option<DateTime<Utc>>,
    pub total_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeClockQueueItem {
    pub meta: QueueItemMeta,
    pub entry_id: RemoteRecordId,
    pub user_id: UserId,
    pub action: ClockAction,
    pub clock_out_time: Option<DateTime<Utc>>,
    pub total_hours: Option<f64>,
}

impl TimeClockQueueItem {
    pub fn from_draft(meta: QueueItemMeta, draft: TimeClockDraft) -> Self {
        Self {
            meta,
            entry_id: draft.entry_id,
            user_id: draft.user_id,
            action: draft.action,
            clock_out_time: draft.clock_out_time.map(|t| t.trunc_subsecs(3)),
            total_hours: draft.total_hours,
        }
    }

    /// When the worker actually performed the action (not when it was synced).
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.clock_out_time.unwrap_or(self.meta.created_at)
    }
}
