//! Mission lifecycle and quality-gate services.
//!
//! Each operation validates permissions through the shared capability
//! check, runs its primary writes in one database transaction, and only
//! after commit emits the best-effort side effects (activity record,
//! realtime event). A datastore error inside the transaction aborts the
//! whole write; a side-effect failure never surfaces to the caller.
//!
//! Known race, accepted by design: concurrent status updates on the same
//! mission are last-write-wins with no conflict detection.

mod missions;
mod quality;
mod tasks;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::activity::ActivityLog;
use crate::auth::{Actor, MissionAccess, Operation};
use crate::db::Database;
use crate::error::{EnarvaError, Result};
use crate::mission::{Mission, MissionType, Priority, store};
use crate::quality::QualityStatus;
use crate::realtime::Broadcaster;

#[derive(Clone)]
pub struct Workflow {
    db: Database,
    activity: ActivityLog,
    events: Broadcaster,
}

impl Workflow {
    pub fn new(db: Database, activity: ActivityLog, events: Broadcaster) -> Self {
        Self {
            db,
            activity,
            events,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.activity
    }

    /// Fetches a mission with its tasks, for callers allowed to view it.
    pub fn mission_detail(&self, mission_id: &str, actor: &Actor) -> Result<MissionDetail> {
        self.db.with_conn(|conn| {
            let mission = store::get_mission(conn, mission_id)?
                .ok_or_else(|| EnarvaError::not_found("Mission", mission_id))?;
            let access = store::load_access(conn, &mission)?;
            crate::auth::check(actor, &access, Operation::ViewMission)?;
            let tasks = store::tasks_for_mission(conn, mission_id)?;
            Ok(MissionDetail { mission, tasks })
        })
    }

    /// Loads mission + access and verifies `op`, without mutating anything.
    fn authorize_mission(
        conn: &rusqlite::Connection,
        mission_id: &str,
        actor: &Actor,
        op: Operation,
    ) -> Result<(Mission, MissionAccess)> {
        let mission = store::get_mission(conn, mission_id)?
            .ok_or_else(|| EnarvaError::not_found("Mission", mission_id))?;
        let access = store::load_access(conn, &mission)?;
        crate::auth::check(actor, &access, op)?;
        Ok((mission, access))
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MissionDetail {
    pub mission: Mission,
    pub tasks: Vec<crate::mission::Task>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMissionRequest {
    pub lead_id: String,
    pub address: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub mission_type: Option<MissionType>,
    #[serde(default)]
    pub estimated_duration_mins: Option<i64>,
    #[serde(default)]
    pub team_leader_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub estimated_minutes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateQualityCheckRequest {
    pub mission_id: String,
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(default)]
    pub status: Option<QualityStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
    #[serde(default)]
    pub issues: Option<Vec<String>>,
}
