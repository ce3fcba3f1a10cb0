use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to an existing row on the backend (a time entry or a project photo).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteRecordId(String);

impl RemoteRecordId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Remote record ID cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for RemoteRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RemoteRecordId> for String {
    fn from(value: RemoteRecordId) -> Self {
        value.0
    }
}
