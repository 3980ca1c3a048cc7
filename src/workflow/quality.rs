//! Quality-check gate operations.

use chrono::Utc;
use serde_json::json;

use super::{CreateQualityCheckRequest, Workflow};
use crate::activity::{ActivityEntry, ActivityType};
use crate::auth::{Actor, Operation};
use crate::error::{EnarvaError, Result};
use crate::mission::{Mission, MissionStatus, store as mission_store};
use crate::quality::{QualityCheck, QualityCheckPatch, store};
use crate::realtime::{EventKind, WorkflowEvent};

impl Workflow {
    /// Records a quality check against an existing mission. Creating a
    /// check is the canonical way a mission enters QUALITY_CHECK: the
    /// mission is forced into that status from any prior one, in the same
    /// transaction.
    pub fn create_quality_check(
        &self,
        req: CreateQualityCheckRequest,
        actor: &Actor,
    ) -> Result<QualityCheck> {
        let (check, mission) = self.db.with_tx(|tx| {
            let (mission, _access) = Self::authorize_mission(
                tx,
                &req.mission_id,
                actor,
                Operation::SubmitQualityCheck,
            )?;

            let mut check = QualityCheck::new(&mission.id, &req.check_type, &actor.id);
            if let Some(status) = req.status {
                check = check.with_status(status);
                if status.is_resolved() {
                    check.validated_by = Some(actor.id.clone());
                    check.validated_at = Some(Utc::now());
                }
            }
            if let Some(notes) = &req.notes {
                check = check.with_notes(notes);
            }
            if let Some(photos) = req.photos.clone() {
                check = check.with_photos(photos);
            }
            if let Some(issues) = req.issues.clone() {
                check = check.with_issues(issues);
            }

            store::insert_quality_check(tx, &check)?;
            mission_store::update_mission_status(tx, &mission.id, MissionStatus::QualityCheck)?;
            Ok((check, mission))
        })?;

        self.activity.record(
            ActivityEntry::new(
                ActivityType::QualityCheckCreated,
                "Quality check created",
                format!(
                    "Quality check {} opened for mission {}",
                    check.check_type, mission.mission_number
                ),
                &actor.id,
            )
            .with_mission(&mission.id)
            .with_lead(&mission.lead_id)
            .with_metadata(json!({ "status": check.status.as_str() })),
        );
        self.events.publish(
            WorkflowEvent::new(EventKind::QualityCheckCreated, &mission.id)
                .with_message(check.status.as_str()),
        );

        Ok(check)
    }

    /// Partial update of a quality check. Resolving to PASSED or FAILED
    /// stamps the validation fields; PENDING and NEEDS_CORRECTION leave
    /// them untouched.
    pub fn update_quality_check(
        &self,
        check_id: &str,
        patch: QualityCheckPatch,
        actor: &Actor,
    ) -> Result<QualityCheck> {
        let (check, mission) = self.db.with_tx(|tx| {
            let mut check = store::get_quality_check(tx, check_id)?
                .ok_or_else(|| EnarvaError::not_found("QualityCheck", check_id))?;
            let (mission, _access) = Self::authorize_mission(
                tx,
                &check.mission_id,
                actor,
                Operation::SubmitQualityCheck,
            )?;

            if let Some(status) = patch.status {
                check.status = status;
                if status.is_resolved() {
                    check.validated_by = Some(actor.id.clone());
                    check.validated_at = Some(Utc::now());
                }
            }
            if let Some(score) = patch.score {
                check.score = Some(score);
            }
            if let Some(notes) = patch.notes {
                check.notes = Some(notes);
            }
            if let Some(photos) = patch.photos {
                check.photos = photos;
            }
            if let Some(issues) = patch.issues {
                check.issues = issues;
            }
            if let Some(corrections) = patch.corrections {
                check.corrections = corrections;
            }

            store::update_quality_check(tx, &check)?;
            Ok((check, mission))
        })?;

        self.activity.record(
            ActivityEntry::new(
                ActivityType::QualityCheckUpdated,
                "Quality check updated",
                format!(
                    "Quality check {} on mission {} is now {}",
                    check.check_type, mission.mission_number, check.status
                ),
                &actor.id,
            )
            .with_mission(&mission.id)
            .with_metadata(json!({ "status": check.status.as_str() })),
        );
        self.events.publish(
            WorkflowEvent::new(EventKind::QualityCheckUpdated, &mission.id)
                .with_message(check.status.as_str()),
        );

        Ok(check)
    }

    /// The quality-assurance worklist (read-only, any authenticated user).
    pub fn pending_quality_checks(&self, _actor: &Actor) -> Result<Vec<Mission>> {
        self.db.with_conn(store::pending_quality_missions)
    }
}
