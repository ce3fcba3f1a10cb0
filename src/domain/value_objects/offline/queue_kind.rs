use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Photo,
    Note,
    TimeClock,
    VoiceNote,
}

impl QueueKind {
    pub const ALL: [QueueKind; 4] = [
        QueueKind::Photo,
        QueueKind::Note,
        QueueKind::TimeClock,
        QueueKind::VoiceNote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueKind::Photo => "photo",
            QueueKind::Note => "note",
            QueueKind::TimeClock => "time_clock",
            QueueKind::VoiceNote => "voice_note",
        }
    }

    /// ローカルDB上のテーブル名
    pub fn table_name(&self) -> &'static str {
        match self {
            QueueKind::Photo => "photo_queue",
            QueueKind::Note => "note_queue",
            QueueKind::TimeClock => "time_clock_queue",
            QueueKind::VoiceNote => "voice_note_queue",
        }
    }

    /// Label persisted for the in-progress state of this kind.
    pub fn in_progress_label(&self) -> &'static str {
        match self {
            QueueKind::Photo => "uploading",
            QueueKind::Note | QueueKind::TimeClock => "syncing",
            QueueKind::VoiceNote => "transcribing",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" | "photos" => Ok(QueueKind::Photo),
            "note" | "notes" => Ok(QueueKind::Note),
            "time_clock" | "time-clock" | "timeclock" => Ok(QueueKind::TimeClock),
            "voice_note" | "voice-note" | "voice" => Ok(QueueKind::VoiceNote),
            other => Err(format!("Unknown queue kind: {other}")),
        }
    }
}
