use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityStatus {
    #[default]
    Pending,
    Passed,
    Failed,
    NeedsCorrection,
}

impl QualityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::NeedsCorrection => "NEEDS_CORRECTION",
        }
    }

    /// Resolved checks stamp the validation fields; pending and
    /// needs-correction leave them untouched.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QualityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PASSED" => Ok(Self::Passed),
            "FAILED" => Ok(Self::Failed),
            "NEEDS_CORRECTION" => Ok(Self::NeedsCorrection),
            _ => Err(format!("Unknown quality status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheck {
    pub id: String,
    pub mission_id: String,
    pub check_type: String,
    pub status: QualityStatus,
    pub score: Option<i64>,
    pub notes: Option<String>,
    pub photos: Vec<String>,
    pub issues: Vec<String>,
    pub corrections: Vec<String>,
    pub checked_by: String,
    pub validated_by: Option<String>,
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl QualityCheck {
    pub fn new(
        mission_id: impl Into<String>,
        check_type: impl Into<String>,
        checked_by: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mission_id: mission_id.into(),
            check_type: check_type.into(),
            status: QualityStatus::Pending,
            score: None,
            notes: None,
            photos: Vec::new(),
            issues: Vec::new(),
            corrections: Vec::new(),
            checked_by: checked_by.into(),
            validated_by: None,
            validated_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: QualityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_photos(mut self, photos: Vec<String>) -> Self {
        self.photos = photos;
        self
    }

    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.issues = issues;
        self
    }
}

/// Partial update applied by `PUT /quality-checks/{id}`. `None` fields are
/// left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheckPatch {
    pub status: Option<QualityStatus>,
    pub score: Option<i64>,
    pub notes: Option<String>,
    pub photos: Option<Vec<String>>,
    pub issues: Option<Vec<String>>,
    pub corrections: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_statuses() {
        assert!(QualityStatus::Passed.is_resolved());
        assert!(QualityStatus::Failed.is_resolved());
        assert!(!QualityStatus::Pending.is_resolved());
        assert!(!QualityStatus::NeedsCorrection.is_resolved());
    }

    #[test]
    fn test_new_check_is_pending() {
        let check = QualityCheck::new("m-1", "FINAL_INSPECTION", "u-1");
        assert_eq!(check.status, QualityStatus::Pending);
        assert!(check.validated_by.is_none());
        assert!(check.validated_at.is_none());
    }
}
