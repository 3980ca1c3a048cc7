use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MissionStatus, TaskStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub mission_number: String,
    pub status: MissionStatus,
    pub priority: Priority,
    pub mission_type: MissionType,
    pub scheduled_at: DateTime<Utc>,
    pub estimated_duration_mins: Option<i64>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub address: String,
    pub admin_notes: Option<String>,
    pub lead_id: String,
    pub team_leader_id: Option<String>,
    pub team_id: Option<String>,
}

impl Mission {
    pub fn new(
        lead_id: impl Into<String>,
        address: impl Into<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let mission_number = format!("MSN-{}", &id[..8].to_uppercase());
        Self {
            id,
            mission_number,
            status: MissionStatus::Scheduled,
            priority: Priority::Normal,
            mission_type: MissionType::Service,
            scheduled_at,
            estimated_duration_mins: None,
            actual_start_time: None,
            actual_end_time: None,
            address: address.into(),
            admin_notes: None,
            lead_id: lead_id.into(),
            team_leader_id: None,
            team_id: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_type(mut self, mission_type: MissionType) -> Self {
        self.mission_type = mission_type;
        self
    }

    pub fn with_team_leader(mut self, user_id: impl Into<String>) -> Self {
        self.team_leader_id = Some(user_id.into());
        self
    }

    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    pub fn with_estimated_duration(mut self, minutes: i64) -> Self {
        self.estimated_duration_mins = Some(minutes);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "NORMAL" => Ok(Self::Normal),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionType {
    #[default]
    Service,
    TechnicalVisit,
    Delivery,
    Internal,
}

impl MissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "SERVICE",
            Self::TechnicalVisit => "TECHNICAL_VISIT",
            Self::Delivery => "DELIVERY",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SERVICE" => Ok(Self::Service),
            "TECHNICAL_VISIT" => Ok(Self::TechnicalVisit),
            "DELIVERY" => Ok(Self::Delivery),
            "INTERNAL" => Ok(Self::Internal),
            _ => Err(format!("Unknown mission type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: TaskStatus,
    pub estimated_minutes: Option<i64>,
    pub actual_minutes: Option<i64>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub mission_id: String,
    pub assigned_to: Option<String>,
}

impl Task {
    pub fn new(mission_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            category: "GENERAL".to_string(),
            status: TaskStatus::Assigned,
            estimated_minutes: None,
            actual_minutes: None,
            started_at: None,
            completed_at: None,
            mission_id: mission_id.into(),
            assigned_to: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to = Some(user_id.into());
        self
    }

    pub fn with_estimated_minutes(mut self, minutes: i64) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_defaults() {
        let mission = Mission::new("l-1", "12 Rue des Fleurs, Rabat", Utc::now());
        assert_eq!(mission.status, MissionStatus::Scheduled);
        assert_eq!(mission.priority, Priority::Normal);
        assert!(mission.actual_start_time.is_none());
        assert!(mission.actual_end_time.is_none());
        assert!(mission.mission_number.starts_with("MSN-"));
    }

    #[test]
    fn test_mission_builders() {
        let mission = Mission::new("l-1", "addr", Utc::now())
            .with_priority(Priority::High)
            .with_type(MissionType::TechnicalVisit)
            .with_team_leader("u-lead")
            .with_team("t-1");
        assert_eq!(mission.priority, Priority::High);
        assert_eq!(mission.mission_type, MissionType::TechnicalVisit);
        assert_eq!(mission.team_leader_id.as_deref(), Some("u-lead"));
        assert_eq!(mission.team_id.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_task_defaults() {
        let task = Task::new("m-1", "Vacuum living room");
        assert_eq!(task.status, TaskStatus::Assigned);
        assert!(task.started_at.is_none());
        assert!(task.completed_at.is_none());
        assert!(task.assigned_to.is_none());
    }
}
