use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MissionScheduled,
    MissionStarted,
    MissionStatusChanged,
    MissionCompleted,
    TaskStatusChanged,
    TaskAssigned,
    QualityCheckCreated,
    QualityCheckUpdated,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissionScheduled => "mission.scheduled",
            Self::MissionStarted => "mission.started",
            Self::MissionStatusChanged => "mission.status_changed",
            Self::MissionCompleted => "mission.completed",
            Self::TaskStatusChanged => "task.status_changed",
            Self::TaskAssigned => "task.assigned",
            Self::QualityCheckCreated => "quality_check.created",
            Self::QualityCheckUpdated => "quality_check.updated",
        }
    }

    pub fn is_mission_level(&self) -> bool {
        matches!(
            self,
            Self::MissionScheduled
                | Self::MissionStarted
                | Self::MissionStatusChanged
                | Self::MissionCompleted
        )
    }
}

/// One workflow event, broadcast after the causing transaction commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub kind: EventKind,
    pub mission_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WorkflowEvent {
    pub fn new(kind: EventKind, mission_id: impl Into<String>) -> Self {
        Self {
            kind,
            mission_id: mission_id.into(),
            created_at: Utc::now(),
            task_id: None,
            message: None,
        }
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(EventKind::MissionStarted.as_str(), "mission.started");
        assert_eq!(EventKind::TaskAssigned.as_str(), "task.assigned");
        assert_eq!(
            EventKind::QualityCheckCreated.as_str(),
            "quality_check.created"
        );
    }

    #[test]
    fn test_mission_level_kinds() {
        assert!(EventKind::MissionStarted.is_mission_level());
        assert!(EventKind::MissionCompleted.is_mission_level());
        assert!(!EventKind::TaskStatusChanged.is_mission_level());
    }

    #[test]
    fn test_event_builders() {
        let event = WorkflowEvent::new(EventKind::TaskStatusChanged, "m-1")
            .with_task("t-1")
            .with_message("COMPLETED");
        assert_eq!(event.mission_id, "m-1");
        assert_eq!(event.task_id.as_deref(), Some("t-1"));
        assert_eq!(event.message.as_deref(), Some("COMPLETED"));
    }
}
