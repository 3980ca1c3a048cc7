//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chrono::Utc;
use enarva_os::activity::ActivityLog;
use enarva_os::auth::{self, Actor, Role};
use enarva_os::db::Database;
use enarva_os::mission::{Mission, Task, store};
use enarva_os::realtime::Broadcaster;
use enarva_os::workflow::{CreateMissionRequest, Workflow};

pub const ADMIN: &str = "u-admin";
pub const MANAGER: &str = "u-manager";
pub const LEADER: &str = "u-leader";
pub const AGENT: &str = "u-agent";
pub const OUTSIDER: &str = "u-outsider";

pub struct TestEnv {
    pub db: Database,
    pub workflow: Workflow,
    pub activity: ActivityLog,
    pub events: Broadcaster,
}

pub fn env() -> TestEnv {
    let db = Database::open_in_memory().expect("in-memory db");
    let activity = ActivityLog::new(db.clone());
    let events = Broadcaster::new(32);
    let workflow = Workflow::new(db.clone(), activity.clone(), events.clone());

    db.with_conn(|conn| {
        auth::insert_user(conn, ADMIN, "Amina", Role::Admin)?;
        auth::insert_user(conn, MANAGER, "Karim", Role::Manager)?;
        auth::insert_user(conn, LEADER, "Souad", Role::TeamLeader)?;
        auth::insert_user(conn, AGENT, "Yassine", Role::Agent)?;
        auth::insert_user(conn, OUTSIDER, "Nadia", Role::Agent)?;

        auth::insert_session(conn, "token-admin", ADMIN)?;
        auth::insert_session(conn, "token-leader", LEADER)?;
        auth::insert_session(conn, "token-agent", AGENT)?;
        auth::insert_session(conn, "token-outsider", OUTSIDER)?;

        store::insert_lead(conn, "l-1", "Villa Yasmine")?;
        store::insert_team(conn, "t-1", "Crew A")?;
        auth::insert_team_member(conn, "tm-1", "t-1", AGENT)?;
        Ok(())
    })
    .expect("seed");

    TestEnv {
        db,
        workflow,
        activity,
        events,
    }
}

pub fn actor(id: &str, role: Role) -> Actor {
    Actor {
        id: id.to_string(),
        name: id.to_string(),
        role,
    }
}

pub fn admin() -> Actor {
    actor(ADMIN, Role::Admin)
}

pub fn leader() -> Actor {
    actor(LEADER, Role::TeamLeader)
}

pub fn agent() -> Actor {
    actor(AGENT, Role::Agent)
}

pub fn outsider() -> Actor {
    actor(OUTSIDER, Role::Agent)
}

/// Schedules a mission led by LEADER with team t-1.
pub fn schedule_mission(env: &TestEnv) -> Mission {
    env.workflow
        .create_mission(
            CreateMissionRequest {
                lead_id: "l-1".to_string(),
                address: "12 Rue des Fleurs, Rabat".to_string(),
                scheduled_at: Utc::now(),
                priority: None,
                mission_type: None,
                estimated_duration_mins: Some(120),
                team_leader_id: Some(LEADER.to_string()),
                team_id: Some("t-1".to_string()),
            },
            &admin(),
        )
        .expect("create mission")
}

/// Adds `count` tasks assigned to AGENT.
pub fn add_tasks(env: &TestEnv, mission_id: &str, count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| {
            env.workflow
                .add_task(
                    mission_id,
                    enarva_os::workflow::CreateTaskRequest {
                        title: format!("Task {}", i + 1),
                        category: Some("CLEANING".to_string()),
                        assigned_to: Some(AGENT.to_string()),
                        estimated_minutes: Some(30),
                    },
                    &admin(),
                )
                .expect("add task")
        })
        .collect()
}

pub fn reload_mission(env: &TestEnv, id: &str) -> Mission {
    env.db
        .with_conn(|conn| store::get_mission(conn, id))
        .expect("query")
        .expect("mission exists")
}

pub fn reload_task(env: &TestEnv, id: &str) -> Task {
    env.db
        .with_conn(|conn| store::get_task(conn, id))
        .expect("query")
        .expect("task exists")
}
