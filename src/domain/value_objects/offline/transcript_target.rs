use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which column of the remote photo record receives a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptTarget {
    Notes,
    Recommendation,
}

impl TranscriptTarget {
    pub fn column(&self) -> &'static str {
        match self {
            TranscriptTarget::Notes => "notes",
            TranscriptTarget::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for TranscriptTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for TranscriptTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notes" => Ok(TranscriptTarget::Notes),
            "recommendation" => Ok(TranscriptTarget::Recommendation),
            other => Err(format!("Unknown transcript target: {other}")),
        }
    }
}
