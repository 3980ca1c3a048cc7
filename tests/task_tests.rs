mod common;

use common::*;
use enarva_os::error::EnarvaError;
use enarva_os::mission::{MissionStatus, TaskStatus};

#[test]
fn test_started_at_stamped_on_assigned_to_in_progress() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);

    let task = env
        .workflow
        .set_task_status(&tasks[0].id, TaskStatus::InProgress, &admin())
        .expect("start task");
    assert_eq!(task.status, TaskStatus::InProgress);
    assert!(task.started_at.is_some());
}

#[test]
fn test_completed_at_stamped_once() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 2);

    let first = env
        .workflow
        .set_task_status(&tasks[0].id, TaskStatus::Completed, &admin())
        .expect("complete");
    let stamped = first.completed_at.expect("completed_at set");

    // Reject and re-complete: the stamp must not move.
    env.workflow
        .set_task_status(&tasks[0].id, TaskStatus::Rejected, &admin())
        .expect("reject");
    let again = env
        .workflow
        .set_task_status(&tasks[0].id, TaskStatus::Completed, &admin())
        .expect("re-complete");
    assert_eq!(again.completed_at, Some(stamped));
}

#[test]
fn test_mission_advances_only_after_last_task_completes() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 3);
    env.workflow.start_mission(&mission.id, &admin()).expect("start");

    env.workflow
        .set_task_status(&tasks[0].id, TaskStatus::Completed, &admin())
        .expect("1st");
    assert_eq!(reload_mission(&env, &mission.id).status, MissionStatus::InProgress);

    env.workflow
        .set_task_status(&tasks[1].id, TaskStatus::Completed, &admin())
        .expect("2nd");
    assert_eq!(reload_mission(&env, &mission.id).status, MissionStatus::InProgress);

    env.workflow
        .set_task_status(&tasks[2].id, TaskStatus::Completed, &admin())
        .expect("3rd");
    let mission = reload_mission(&env, &mission.id);
    assert_eq!(mission.status, MissionStatus::QualityCheck);
    assert!(mission.actual_end_time.is_some());
}

#[test]
fn test_assign_changes_assignee_only() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);
    env.workflow
        .set_task_status(&tasks[0].id, TaskStatus::InProgress, &admin())
        .expect("start task");

    let task = env
        .workflow
        .assign_task(&tasks[0].id, MANAGER, &admin())
        .expect("reassign");
    assert_eq!(task.assigned_to.as_deref(), Some(MANAGER));
    assert_eq!(task.status, TaskStatus::InProgress);
}

#[test]
fn test_assign_missing_task_is_not_found() {
    let env = env();
    let err = env.workflow.assign_task("t-missing", AGENT, &admin()).unwrap_err();
    assert!(matches!(err, EnarvaError::NotFound { kind: "Task", .. }));
}

#[test]
fn test_assign_missing_member_is_not_found_and_writes_nothing() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);

    let err = env
        .workflow
        .assign_task(&tasks[0].id, "u-ghost", &admin())
        .unwrap_err();
    assert!(matches!(err, EnarvaError::NotFound { kind: "Member", .. }));

    let task = reload_task(&env, &tasks[0].id);
    assert_eq!(task.assigned_to.as_deref(), Some(AGENT));
}

#[test]
fn test_assignee_may_update_own_task() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);

    let task = env
        .workflow
        .set_task_status(&tasks[0].id, TaskStatus::Completed, &agent())
        .expect("assignee completes");
    assert_eq!(task.status, TaskStatus::Completed);
}

#[test]
fn test_unrelated_agent_cannot_update_task() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);

    let err = env
        .workflow
        .set_task_status(&tasks[0].id, TaskStatus::Completed, &outsider())
        .unwrap_err();
    assert!(matches!(err, EnarvaError::Forbidden(_)));
}

#[test]
fn test_team_member_may_assign() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);

    let task = env
        .workflow
        .assign_task(&tasks[0].id, MANAGER, &agent())
        .expect("member reassigns");
    assert_eq!(task.assigned_to.as_deref(), Some(MANAGER));
}

#[test]
fn test_assignee_outside_team_may_reassign_own_task() {
    let env = env();
    let mission = schedule_mission(&env);
    let task = env
        .workflow
        .add_task(
            &mission.id,
            enarva_os::workflow::CreateTaskRequest {
                title: "Window polish".to_string(),
                category: None,
                assigned_to: Some(OUTSIDER.to_string()),
                estimated_minutes: None,
            },
            &admin(),
        )
        .expect("add task");

    // OUTSIDER is not on team t-1; the assignee relationship alone grants it.
    let task = env
        .workflow
        .assign_task(&task.id, AGENT, &outsider())
        .expect("assignee reassigns");
    assert_eq!(task.assigned_to.as_deref(), Some(AGENT));
}

#[test]
fn test_unrelated_agent_cannot_assign() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);

    let err = env
        .workflow
        .assign_task(&tasks[0].id, MANAGER, &outsider())
        .unwrap_err();
    assert!(matches!(err, EnarvaError::Forbidden(_)));
}

#[test]
fn test_missing_task_is_not_found_on_status_update() {
    let env = env();
    let err = env
        .workflow
        .set_task_status("t-missing", TaskStatus::Completed, &admin())
        .unwrap_err();
    assert!(matches!(err, EnarvaError::NotFound { kind: "Task", .. }));
}
