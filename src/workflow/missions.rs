//! Mission state transitions.

use chrono::Utc;
use serde_json::json;

use super::{CreateMissionRequest, Workflow};
use crate::activity::{ActivityEntry, ActivityType};
use crate::auth::{Actor, MissionAccess, Operation};
use crate::error::{EnarvaError, Result};
use crate::mission::{Mission, MissionStatus, TaskStatus, store};
use crate::realtime::{EventKind, WorkflowEvent};

impl Workflow {
    /// Schedules a new mission against an existing lead.
    pub fn create_mission(&self, req: CreateMissionRequest, actor: &Actor) -> Result<Mission> {
        crate::auth::check(actor, &MissionAccess::default(), Operation::CreateMission)?;

        let mission = self.db.with_tx(|tx| {
            if !store::lead_exists(tx, &req.lead_id)? {
                return Err(EnarvaError::not_found("Lead", &req.lead_id));
            }
            let mut mission = Mission::new(&req.lead_id, &req.address, req.scheduled_at);
            if let Some(priority) = req.priority {
                mission = mission.with_priority(priority);
            }
            if let Some(mission_type) = req.mission_type {
                mission = mission.with_type(mission_type);
            }
            if let Some(minutes) = req.estimated_duration_mins {
                mission = mission.with_estimated_duration(minutes);
            }
            if let Some(leader) = &req.team_leader_id {
                mission = mission.with_team_leader(leader);
            }
            if let Some(team) = &req.team_id {
                mission = mission.with_team(team);
            }
            store::insert_mission(tx, &mission)?;
            Ok(mission)
        })?;

        self.activity.record(
            ActivityEntry::new(
                ActivityType::MissionScheduled,
                "Mission scheduled",
                format!("Mission {} scheduled", mission.mission_number),
                &actor.id,
            )
            .with_mission(&mission.id)
            .with_lead(&mission.lead_id),
        );
        self.events
            .publish(WorkflowEvent::new(EventKind::MissionScheduled, &mission.id));

        Ok(mission)
    }

    /// Transitions a SCHEDULED mission to IN_PROGRESS, stamping the actual
    /// start time and starting every still-ASSIGNED task.
    pub fn start_mission(&self, mission_id: &str, actor: &Actor) -> Result<Mission> {
        let (mission, started_tasks) = self.db.with_tx(|tx| {
            let (mission, _access) =
                Self::authorize_mission(tx, mission_id, actor, Operation::StartMission)?;

            if mission.status != MissionStatus::Scheduled {
                return Err(EnarvaError::invalid_state(
                    MissionStatus::Scheduled.as_str(),
                    mission.status.as_str(),
                ));
            }

            let now = Utc::now();
            store::update_mission_status(tx, &mission.id, MissionStatus::InProgress)?;
            store::set_actual_start(tx, &mission.id, &now)?;
            let started = store::start_assigned_tasks(tx, &mission.id, &now)?;

            let mission = store::get_mission(tx, mission_id)?
                .ok_or_else(|| EnarvaError::not_found("Mission", mission_id))?;
            Ok((mission, started))
        })?;

        self.activity.record(
            ActivityEntry::new(
                ActivityType::MissionStarted,
                "Mission started",
                format!(
                    "Mission {} started ({} tasks moved to IN_PROGRESS)",
                    mission.mission_number, started_tasks
                ),
                &actor.id,
            )
            .with_mission(&mission.id)
            .with_lead(&mission.lead_id),
        );
        self.events
            .publish(WorkflowEvent::new(EventKind::MissionStarted, &mission.id));

        Ok(mission)
    }

    /// Generic status update, unguarded by a transition table so the back
    /// office can correct any mission.
    ///
    /// Auto-upgrade rule: a request for IN_PROGRESS on a mission whose
    /// tasks are all VALIDATED (and at least one exists) is silently
    /// upgraded to QUALITY_CHECK. `actual_end_time` is set only for the
    /// effective status COMPLETED and cleared otherwise.
    pub fn set_mission_status(
        &self,
        mission_id: &str,
        requested: MissionStatus,
        notes: Option<&str>,
        actor: &Actor,
    ) -> Result<Mission> {
        let mission = self.db.with_tx(|tx| {
            let (mission, _access) =
                Self::authorize_mission(tx, mission_id, actor, Operation::UpdateMissionStatus)?;

            let effective = if requested == MissionStatus::InProgress {
                let tasks = store::tasks_for_mission(tx, &mission.id)?;
                let all_validated = !tasks.is_empty()
                    && tasks.iter().all(|t| t.status == TaskStatus::Validated);
                if all_validated {
                    MissionStatus::QualityCheck
                } else {
                    requested
                }
            } else {
                requested
            };

            let now = Utc::now();
            store::update_mission_status(tx, &mission.id, effective)?;
            if effective.is_terminal() {
                store::set_actual_end(tx, &mission.id, Some(&now))?;
            } else {
                store::set_actual_end(tx, &mission.id, None)?;
            }
            if let Some(notes) = notes {
                store::set_admin_notes(tx, &mission.id, notes)?;
            }

            let mission = store::get_mission(tx, mission_id)?
                .ok_or_else(|| EnarvaError::not_found("Mission", mission_id))?;
            Ok(mission)
        })?;

        self.activity.record(
            ActivityEntry::new(
                ActivityType::MissionStatusChanged,
                "Mission status updated",
                format!(
                    "Mission {} moved to {}",
                    mission.mission_number, mission.status
                ),
                &actor.id,
            )
            .with_mission(&mission.id)
            .with_lead(&mission.lead_id)
            .with_metadata(json!({
                "requested": requested.as_str(),
                "effective": mission.status.as_str(),
            })),
        );

        let kind = if mission.status == MissionStatus::Completed {
            EventKind::MissionCompleted
        } else {
            EventKind::MissionStatusChanged
        };
        self.events.publish(
            WorkflowEvent::new(kind, &mission.id).with_message(mission.status.as_str()),
        );

        Ok(mission)
    }
}
