//! Task status tracking and assignment.

use chrono::Utc;
use serde_json::json;

use super::{CreateTaskRequest, Workflow};
use crate::activity::{ActivityEntry, ActivityType};
use crate::auth::{Actor, Operation};
use crate::error::{EnarvaError, Result};
use crate::mission::{Mission, MissionStatus, Task, TaskStatus, store};
use crate::realtime::{EventKind, WorkflowEvent};

impl Workflow {
    /// Adds a task to an existing mission.
    pub fn add_task(
        &self,
        mission_id: &str,
        req: CreateTaskRequest,
        actor: &Actor,
    ) -> Result<Task> {
        let (task, mission) = self.db.with_tx(|tx| {
            let (mission, _access) =
                Self::authorize_mission(tx, mission_id, actor, Operation::CreateTask)?;

            if let Some(assignee) = &req.assigned_to {
                if crate::auth::find_user(tx, assignee)?.is_none() {
                    return Err(EnarvaError::not_found("Member", assignee));
                }
            }

            let mut task = Task::new(&mission.id, &req.title);
            if let Some(category) = &req.category {
                task = task.with_category(category);
            }
            if let Some(assignee) = &req.assigned_to {
                task = task.with_assignee(assignee);
            }
            if let Some(minutes) = req.estimated_minutes {
                task = task.with_estimated_minutes(minutes);
            }
            store::insert_task(tx, &task)?;
            Ok((task, mission))
        })?;

        self.activity.record(
            ActivityEntry::new(
                ActivityType::TaskCreated,
                "Task created",
                format!("Task '{}' added to mission {}", task.title, mission.mission_number),
                &actor.id,
            )
            .with_mission(&mission.id),
        );

        Ok(task)
    }

    /// Sets a task's status. Transitions are permission-gated, not
    /// state-gated; the automatic side effects are the `started_at` and
    /// `completed_at` stamps and the mission auto-advance when the last
    /// incomplete task completes.
    pub fn set_task_status(
        &self,
        task_id: &str,
        status: TaskStatus,
        actor: &Actor,
    ) -> Result<Task> {
        let outcome = self.db.with_tx(|tx| {
            let task = store::get_task(tx, task_id)?
                .ok_or_else(|| EnarvaError::not_found("Task", task_id))?;
            let mission = store::get_mission(tx, &task.mission_id)?
                .ok_or_else(|| EnarvaError::not_found("Mission", &task.mission_id))?;
            let access = store::load_access(tx, &mission)?
                .with_task_assignee(task.assigned_to.clone());
            crate::auth::check(actor, &access, Operation::UpdateTask)?;

            let previous = task.status;
            let now = Utc::now();
            store::update_task_status(tx, &task.id, status)?;

            if previous == TaskStatus::Assigned && status == TaskStatus::InProgress {
                store::set_task_started(tx, &task.id, &now)?;
            }
            // completed_at is stamped exactly once, on first entry.
            if status == TaskStatus::Completed && task.completed_at.is_none() {
                store::set_task_completed(tx, &task.id, &now)?;
            }

            // Task-driven propagation: completing the last incomplete task
            // pushes the mission into quality check and stamps its end time.
            let mut mission_advanced = false;
            if status == TaskStatus::Completed {
                let tasks = store::tasks_for_mission(tx, &mission.id)?;
                let all_completed =
                    !tasks.is_empty() && tasks.iter().all(|t| t.status == TaskStatus::Completed);
                if all_completed {
                    store::update_mission_status(tx, &mission.id, MissionStatus::QualityCheck)?;
                    store::set_actual_end(tx, &mission.id, Some(&now))?;
                    mission_advanced = true;
                }
            }

            let task = store::get_task(tx, task_id)?
                .ok_or_else(|| EnarvaError::not_found("Task", task_id))?;
            Ok(TaskUpdateOutcome {
                task,
                mission,
                previous,
                mission_advanced,
            })
        })?;

        self.activity.record(
            ActivityEntry::new(
                ActivityType::TaskStatusChanged,
                "Task status updated",
                format!(
                    "Task '{}' moved from {} to {}",
                    outcome.task.title, outcome.previous, outcome.task.status
                ),
                &actor.id,
            )
            .with_mission(&outcome.mission.id)
            .with_metadata(json!({
                "from": outcome.previous.as_str(),
                "to": outcome.task.status.as_str(),
            })),
        );
        self.events.publish(
            WorkflowEvent::new(EventKind::TaskStatusChanged, &outcome.mission.id)
                .with_task(&outcome.task.id)
                .with_message(outcome.task.status.as_str()),
        );

        if outcome.mission_advanced {
            self.activity.record(
                ActivityEntry::new(
                    ActivityType::MissionStatusChanged,
                    "Mission entered quality check",
                    format!(
                        "All tasks of mission {} completed",
                        outcome.mission.mission_number
                    ),
                    &actor.id,
                )
                .with_mission(&outcome.mission.id)
                .with_lead(&outcome.mission.lead_id),
            );
            self.events.publish(
                WorkflowEvent::new(EventKind::MissionStatusChanged, &outcome.mission.id)
                    .with_message(MissionStatus::QualityCheck.as_str()),
            );
        }

        Ok(outcome.task)
    }

    /// Reassigns a task. Changes only the assignee reference, never the
    /// status.
    pub fn assign_task(&self, task_id: &str, member_id: &str, actor: &Actor) -> Result<Task> {
        let (task, mission) = self.db.with_tx(|tx| {
            let task = store::get_task(tx, task_id)?
                .ok_or_else(|| EnarvaError::not_found("Task", task_id))?;
            if crate::auth::find_user(tx, member_id)?.is_none() {
                return Err(EnarvaError::not_found("Member", member_id));
            }
            let mission = store::get_mission(tx, &task.mission_id)?
                .ok_or_else(|| EnarvaError::not_found("Mission", &task.mission_id))?;
            let access = store::load_access(tx, &mission)?
                .with_task_assignee(task.assigned_to.clone());
            crate::auth::check(actor, &access, Operation::AssignTask)?;

            store::set_task_assignee(tx, &task.id, member_id)?;
            let task = store::get_task(tx, task_id)?
                .ok_or_else(|| EnarvaError::not_found("Task", task_id))?;
            Ok((task, mission))
        })?;

        self.activity.record(
            ActivityEntry::new(
                ActivityType::TaskAssigned,
                "Task assigned",
                format!("Task '{}' assigned to {}", task.title, member_id),
                &actor.id,
            )
            .with_mission(&mission.id),
        );
        self.events.publish(
            WorkflowEvent::new(EventKind::TaskAssigned, &mission.id).with_task(&task.id),
        );

        Ok(task)
    }
}

struct TaskUpdateOutcome {
    task: Task,
    mission: Mission,
    previous: TaskStatus,
    mission_advanced: bool,
}
