use super::QueueKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a queued item. The in-progress state is persisted with a
/// kind-specific label (`uploading`, `syncing`, `transcribing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Pending,
    InProgress,
    Failed,
    Completed,
}

impl QueueStatus {
    pub fn label(&self, kind: QueueKind) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::InProgress => kind.in_progress_label(),
            QueueStatus::Failed => "failed",
            QueueStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "pending" => Ok(QueueStatus::Pending),
            "uploading" | "syncing" | "transcribing" | "in_progress" => {
                Ok(QueueStatus::InProgress)
            }
            "failed" => Ok(QueueStatus::Failed),
            "completed" => Ok(QueueStatus::Completed),
            other => Err(format!("Unknown queue status: {other}")),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueStatus::Completed)
    }

    /// `pending → in-progress → {completed | failed}`, `failed → in-progress` on retry.
    /// In-progress may fall back to pending (interrupted run) and failed may be reset to
    /// pending. Completed is terminal.
    pub fn can_transition_to(&self, next: QueueStatus) -> bool {
        matches!(
            (*self, next),
            (QueueStatus::Pending, QueueStatus::InProgress)
                | (
                    QueueStatus::InProgress,
                    QueueStatus::Completed | QueueStatus::Failed | QueueStatus::Pending
                )
                | (QueueStatus::Failed, QueueStatus::InProgress | QueueStatus::Pending)
        )
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            QueueStatus::Pending => "pending",
            QueueStatus::InProgress => "in_progress",
            QueueStatus::Failed => "failed",
            QueueStatus::Completed => "completed",
        };
        write!(f, "{value}")
    }
}
