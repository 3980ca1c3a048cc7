use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    MissionScheduled,
    MissionStarted,
    MissionStatusChanged,
    TaskCreated,
    TaskStatusChanged,
    TaskAssigned,
    QualityCheckCreated,
    QualityCheckUpdated,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissionScheduled => "mission.scheduled",
            Self::MissionStarted => "mission.started",
            Self::MissionStatusChanged => "mission.status_changed",
            Self::TaskCreated => "task.created",
            Self::TaskStatusChanged => "task.status_changed",
            Self::TaskAssigned => "task.assigned",
            Self::QualityCheckCreated => "quality_check.created",
            Self::QualityCheckUpdated => "quality_check.updated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mission.scheduled" => Some(Self::MissionScheduled),
            "mission.started" => Some(Self::MissionStarted),
            "mission.status_changed" => Some(Self::MissionStatusChanged),
            "task.created" => Some(Self::TaskCreated),
            "task.status_changed" => Some(Self::TaskStatusChanged),
            "task.assigned" => Some(Self::TaskAssigned),
            "quality_check.created" => Some(Self::QualityCheckCreated),
            "quality_check.updated" => Some(Self::QualityCheckUpdated),
            _ => None,
        }
    }
}

/// One immutable audit-log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub lead_id: Option<String>,
    pub mission_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Builder for an activity append.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    pub user_id: String,
    pub lead_id: Option<String>,
    pub mission_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl ActivityEntry {
    pub fn new(
        activity_type: ActivityType,
        title: impl Into<String>,
        description: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            activity_type,
            title: title.into(),
            description: description.into(),
            user_id: user_id.into(),
            lead_id: None,
            mission_id: None,
            metadata: None,
        }
    }

    pub fn with_mission(mut self, mission_id: impl Into<String>) -> Self {
        self.mission_id = Some(mission_id.into());
        self
    }

    pub fn with_lead(mut self, lead_id: impl Into<String>) -> Self {
        self.lead_id = Some(lead_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
