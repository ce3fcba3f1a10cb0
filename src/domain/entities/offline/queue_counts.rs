use crate::domain::value_objects::offline::QueueKind;
use serde::{Deserialize, Serialize};

/// Items not yet completed, per queue. Feeds the "sync pending" badge.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueueCounts {
    pub photos: u64,
    pub notes: u64,
    pub time_clock: u64,
    pub voice_notes: u64,
    pub total: u64,
}

impl QueueCounts {
    pub fn set(&mut self, kind: QueueKind, count: u64) {
        match kind {
            QueueKind::Photo => self.photos = count,
            QueueKind::Note => self.notes = count,
            QueueKind::TimeClock => self.time_clock = count,
            QueueKind::VoiceNote => self.voice_notes = count,
        }
        self.total = self.photos + self.notes + self.time_clock + self.voice_notes;
    }

    pub fn get(&self, kind: QueueKind) -> u64 {
        match kind {
            QueueKind::Photo => self.photos,
            QueueKind::Note => self.notes,
            QueueKind::TimeClock => self.time_clock,
            QueueKind::VoiceNote => self.voice_notes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
