use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    #[default]
    Scheduled,
    InProgress,
    QualityCheck,
    Completed,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::QualityCheck => "QUALITY_CHECK",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(Self::Scheduled),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "QUALITY_CHECK" => Ok(Self::QualityCheck),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("Unknown mission status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Assigned,
    InProgress,
    Completed,
    Validated,
    Rejected,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Validated => "VALIDATED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSIGNED" => Ok(Self::Assigned),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "VALIDATED" => Ok(Self::Validated),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_status_round_trip() {
        for status in [
            MissionStatus::Scheduled,
            MissionStatus::InProgress,
            MissionStatus::QualityCheck,
            MissionStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<MissionStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_terminal_status() {
        assert!(MissionStatus::Completed.is_terminal());
        assert!(!MissionStatus::QualityCheck.is_terminal());
        assert!(!MissionStatus::Scheduled.is_terminal());
    }

    #[test]
    fn test_task_status_round_trip() {
        for status in [
            TaskStatus::Assigned,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Validated,
            TaskStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_json_representation() {
        let json = serde_json::to_string(&MissionStatus::QualityCheck).expect("serialize");
        assert_eq!(json, "\"QUALITY_CHECK\"");
        let json = serde_json::to_string(&TaskStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"IN_PROGRESS\"");
    }
}
