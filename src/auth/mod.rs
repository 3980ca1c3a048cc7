//! Actors, roles, and the capability check.
//!
//! Every handler routes its permission decision through
//! `allowed_operations`, one shared function from (actor, mission
//! relationships) to the set of operations the caller may perform.

mod store;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use store::{find_actor_by_token, find_user, insert_session, insert_team_member, insert_user};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    TeamLeader,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::TeamLeader => "TEAM_LEADER",
            Self::Agent => "AGENT",
        }
    }

    pub fn is_back_office(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "TEAM_LEADER" => Ok(Self::TeamLeader),
            "AGENT" => Ok(Self::Agent),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Operation {
    CreateMission,
    StartMission,
    UpdateMissionStatus,
    CreateTask,
    UpdateTask,
    AssignTask,
    SubmitQualityCheck,
    ViewMission,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreateMission => "create mission",
            Self::StartMission => "start mission",
            Self::UpdateMissionStatus => "update mission status",
            Self::CreateTask => "create task",
            Self::UpdateTask => "update task",
            Self::AssignTask => "assign task",
            Self::SubmitQualityCheck => "submit quality check",
            Self::ViewMission => "view mission",
        };
        write!(f, "{}", s)
    }
}

/// The caller's relationships to one mission, loaded per request.
#[derive(Debug, Clone, Default)]
pub struct MissionAccess {
    pub team_leader_id: Option<String>,
    pub team_member_ids: Vec<String>,
    /// Assignee of the specific task being mutated, when applicable.
    pub task_assignee_id: Option<String>,
}

impl MissionAccess {
    pub fn with_task_assignee(mut self, assignee: Option<String>) -> Self {
        self.task_assignee_id = assignee;
        self
    }
}

/// Computes the operations `actor` may perform against a mission.
pub fn allowed_operations(actor: &Actor, access: &MissionAccess) -> BTreeSet<Operation> {
    use Operation::*;

    let mut ops = BTreeSet::new();

    if actor.role.is_back_office() {
        ops.extend([
            CreateMission,
            StartMission,
            UpdateMissionStatus,
            CreateTask,
            UpdateTask,
            AssignTask,
            SubmitQualityCheck,
            ViewMission,
        ]);
        return ops;
    }

    let is_leader = access.team_leader_id.as_deref() == Some(actor.id.as_str());
    let is_member = access.team_member_ids.iter().any(|m| m == &actor.id);
    let is_assignee = access.task_assignee_id.as_deref() == Some(actor.id.as_str());

    if is_leader {
        ops.extend([
            StartMission,
            UpdateMissionStatus,
            UpdateTask,
            AssignTask,
            SubmitQualityCheck,
            ViewMission,
        ]);
    }
    if is_member {
        ops.extend([StartMission, UpdateTask, AssignTask, ViewMission]);
    }
    if is_assignee {
        ops.extend([UpdateTask, AssignTask, ViewMission]);
    }

    ops
}

/// Convenience wrapper used by the workflow services.
pub fn check(
    actor: &Actor,
    access: &MissionAccess,
    op: Operation,
) -> crate::error::Result<()> {
    if allowed_operations(actor, access).contains(&op) {
        Ok(())
    } else {
        Err(crate::error::EnarvaError::forbidden(op.to_string()))
    }
}
