use crate::domain::value_objects::offline::QueueKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainTrigger {
    AppStart,
    BecameOnline,
    Manual,
}

impl fmt::Display for DrainTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            DrainTrigger::AppStart => "app_start",
            DrainTrigger::BecameOnline => "became_online",
            DrainTrigger::Manual => "manual",
        };
        write!(f, "{value}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindDrainReport {
    pub kind: QueueKind,
    /// In-progress items from an interrupted run put back to pending.
    pub recovered: u64,
    pub attempted: u32,
    pub completed: u32,
    pub failed: u32,
    /// Items left untouched because the queue has no remote operation yet.
    pub skipped: u32,
    pub cleared: u64,
    /// Local store failure that stopped this queue's pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KindDrainReport {
    pub fn new(kind: QueueKind) -> Self {
        Self {
            kind,
            recovered: 0,
            attempted: 0,
            completed: 0,
            failed: 0,
            skipped: 0,
            cleared: 0,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrainReport {
    pub trigger: DrainTrigger,
    pub recovered: u64,
    pub kinds: Vec<KindDrainReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DrainReport {
    pub fn completed(&self) -> u32 {
        self.kinds.iter().map(|k| k.completed).sum()
    }

    pub fn failed(&self) -> u32 {
        self.kinds.iter().map(|k| k.failed).sum()
    }

    pub fn skipped(&self) -> u32 {
        self.kinds.iter().map(|k| k.skipped).sum()
    }

    pub fn for_kind(&self, kind: QueueKind) -> Option<&KindDrainReport> {
        self.kinds.iter().find(|k| k.kind == kind)
    }
}
