use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    ClockOut,
    StartBreak,
    EndBreak,
}

impl ClockAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockAction::ClockOut => "clock_out",
            ClockAction::StartBreak => "start_break",
            ClockAction::EndBreak => "end_break",
        }
    }
}

impl fmt::Display for ClockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClockAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clock_out" => Ok(ClockAction::ClockOut),
            "start_break" => Ok(ClockAction::StartBreak),
            "end_break" => Ok(ClockAction::EndBreak),
            other => Err(format!("Unknown time clock action: {other}")),
        }
    }
}
