use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Status flag of a stream record. Any status may be set from any other.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StreamStatus {
    #[default]
    Pending,
    Active,
    Stopped,
}

impl Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            StreamStatus::Pending => "pending",
            StreamStatus::Active => "active",
            StreamStatus::Stopped => "stopped",
        };
        write!(f, "{}", status)
    }
}

impl FromStr for StreamStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Ok(StreamStatus::Pending),
            "active" => Ok(StreamStatus::Active),
            "stopped" => Ok(StreamStatus::Stopped),
            other => Err(format!("Unknown stream status: {}", other)),
        }
    }
}
