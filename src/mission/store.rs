//! SQL persistence for missions and tasks.
//!
//! Every function takes a `&Connection` so it composes with the
//! transaction helper in `db`: a `rusqlite::Transaction` derefs to
//! `Connection`, letting the workflow services run several of these
//! inside one all-or-nothing commit.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{Mission, MissionStatus, Task, TaskStatus};
use crate::auth::MissionAccess;
use crate::db::{opt_ts_from_sql, ts_from_sql, ts_to_sql};
use crate::error::{EnarvaError, Result};

const MISSION_COLS: &str = "id, mission_number, status, priority, mission_type, scheduled_at, \
     estimated_duration_mins, actual_start_time, actual_end_time, address, admin_notes, \
     lead_id, team_leader_id, team_id";

const TASK_COLS: &str = "id, title, category, status, estimated_minutes, actual_minutes, \
     started_at, completed_at, mission_id, assigned_to";

pub fn insert_lead(conn: &Connection, id: &str, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO leads (id, name) VALUES (?1, ?2)",
        params![id, name],
    )?;
    Ok(())
}

pub fn lead_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM leads WHERE id = ?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_team(conn: &Connection, id: &str, name: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO teams (id, name) VALUES (?1, ?2)",
        params![id, name],
    )?;
    Ok(())
}

pub fn insert_mission(conn: &Connection, mission: &Mission) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO missions ({MISSION_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"),
        params![
            mission.id,
            mission.mission_number,
            mission.status.as_str(),
            mission.priority.as_str(),
            mission.mission_type.as_str(),
            ts_to_sql(&mission.scheduled_at),
            mission.estimated_duration_mins,
            mission.actual_start_time.as_ref().map(ts_to_sql),
            mission.actual_end_time.as_ref().map(ts_to_sql),
            mission.address,
            mission.admin_notes,
            mission.lead_id,
            mission.team_leader_id,
            mission.team_id,
        ],
    )?;
    Ok(())
}

pub fn get_mission(conn: &Connection, id: &str) -> Result<Option<Mission>> {
    let row = conn
        .query_row(
            &format!("SELECT {MISSION_COLS} FROM missions WHERE id = ?1"),
            params![id],
            read_mission_row,
        )
        .optional()?;
    row.map(mission_from_row).transpose()
}

pub fn update_mission_status(conn: &Connection, id: &str, status: MissionStatus) -> Result<()> {
    conn.execute(
        "UPDATE missions SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )?;
    Ok(())
}

pub fn set_actual_start(conn: &Connection, id: &str, at: &DateTime<Utc>) -> Result<()> {
    conn.execute(
        "UPDATE missions SET actual_start_time = ?2 WHERE id = ?1",
        params![id, ts_to_sql(at)],
    )?;
    Ok(())
}

pub fn set_actual_end(conn: &Connection, id: &str, at: Option<&DateTime<Utc>>) -> Result<()> {
    conn.execute(
        "UPDATE missions SET actual_end_time = ?2 WHERE id = ?1",
        params![id, at.map(ts_to_sql)],
    )?;
    Ok(())
}

pub fn set_admin_notes(conn: &Connection, id: &str, notes: &str) -> Result<()> {
    conn.execute(
        "UPDATE missions SET admin_notes = ?2 WHERE id = ?1",
        params![id, notes],
    )?;
    Ok(())
}

pub fn insert_task(conn: &Connection, task: &Task) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO tasks ({TASK_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
        params![
            task.id,
            task.title,
            task.category,
            task.status.as_str(),
            task.estimated_minutes,
            task.actual_minutes,
            task.started_at.as_ref().map(ts_to_sql),
            task.completed_at.as_ref().map(ts_to_sql),
            task.mission_id,
            task.assigned_to,
        ],
    )?;
    Ok(())
}

pub fn get_task(conn: &Connection, id: &str) -> Result<Option<Task>> {
    let row = conn
        .query_row(
            &format!("SELECT {TASK_COLS} FROM tasks WHERE id = ?1"),
            params![id],
            read_task_row,
        )
        .optional()?;
    row.map(task_from_row).transpose()
}

pub fn tasks_for_mission(conn: &Connection, mission_id: &str) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLS} FROM tasks WHERE mission_id = ?1 ORDER BY rowid"
    ))?;
    let rows = stmt.query_map(params![mission_id], read_task_row)?;
    let mut tasks = Vec::new();
    for row in rows {
        tasks.push(task_from_row(row?)?);
    }
    Ok(tasks)
}

pub fn update_task_status(conn: &Connection, id: &str, status: TaskStatus) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )?;
    Ok(())
}

pub fn set_task_started(conn: &Connection, id: &str, at: &DateTime<Utc>) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET started_at = ?2 WHERE id = ?1",
        params![id, ts_to_sql(at)],
    )?;
    Ok(())
}

pub fn set_task_completed(conn: &Connection, id: &str, at: &DateTime<Utc>) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET completed_at = ?2 WHERE id = ?1",
        params![id, ts_to_sql(at)],
    )?;
    Ok(())
}

pub fn set_task_assignee(conn: &Connection, id: &str, user_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE tasks SET assigned_to = ?2 WHERE id = ?1",
        params![id, user_id],
    )?;
    Ok(())
}

/// Moves every ASSIGNED task of the mission to IN_PROGRESS, stamping
/// `started_at`. Returns how many tasks were started.
pub fn start_assigned_tasks(
    conn: &Connection,
    mission_id: &str,
    at: &DateTime<Utc>,
) -> Result<usize> {
    let n = conn.execute(
        "UPDATE tasks SET status = 'IN_PROGRESS', started_at = ?2
         WHERE mission_id = ?1 AND status = 'ASSIGNED'",
        params![mission_id, ts_to_sql(at)],
    )?;
    Ok(n)
}

/// Loads the caller-relationship data the capability check needs.
pub fn load_access(conn: &Connection, mission: &Mission) -> Result<MissionAccess> {
    let mut member_ids = Vec::new();
    if let Some(team_id) = &mission.team_id {
        let mut stmt = conn.prepare("SELECT user_id FROM team_members WHERE team_id = ?1")?;
        let rows = stmt.query_map(params![team_id], |r| r.get::<_, String>(0))?;
        for row in rows {
            member_ids.push(row?);
        }
    }
    Ok(MissionAccess {
        team_leader_id: mission.team_leader_id.clone(),
        team_member_ids: member_ids,
        task_assignee_id: None,
    })
}

struct MissionRow {
    id: String,
    mission_number: String,
    status: String,
    priority: String,
    mission_type: String,
    scheduled_at: String,
    estimated_duration_mins: Option<i64>,
    actual_start_time: Option<String>,
    actual_end_time: Option<String>,
    address: String,
    admin_notes: Option<String>,
    lead_id: String,
    team_leader_id: Option<String>,
    team_id: Option<String>,
}

fn read_mission_row(r: &Row<'_>) -> rusqlite::Result<MissionRow> {
    Ok(MissionRow {
        id: r.get(0)?,
        mission_number: r.get(1)?,
        status: r.get(2)?,
        priority: r.get(3)?,
        mission_type: r.get(4)?,
        scheduled_at: r.get(5)?,
        estimated_duration_mins: r.get(6)?,
        actual_start_time: r.get(7)?,
        actual_end_time: r.get(8)?,
        address: r.get(9)?,
        admin_notes: r.get(10)?,
        lead_id: r.get(11)?,
        team_leader_id: r.get(12)?,
        team_id: r.get(13)?,
    })
}

fn mission_from_row(row: MissionRow) -> Result<Mission> {
    Ok(Mission {
        id: row.id,
        mission_number: row.mission_number,
        status: row.status.parse().map_err(EnarvaError::Internal)?,
        priority: row.priority.parse().map_err(EnarvaError::Internal)?,
        mission_type: row.mission_type.parse().map_err(EnarvaError::Internal)?,
        scheduled_at: ts_from_sql(&row.scheduled_at)?,
        estimated_duration_mins: row.estimated_duration_mins,
        actual_start_time: opt_ts_from_sql(row.actual_start_time)?,
        actual_end_time: opt_ts_from_sql(row.actual_end_time)?,
        address: row.address,
        admin_notes: row.admin_notes,
        lead_id: row.lead_id,
        team_leader_id: row.team_leader_id,
        team_id: row.team_id,
    })
}

struct TaskRow {
    id: String,
    title: String,
    category: String,
    status: String,
    estimated_minutes: Option<i64>,
    actual_minutes: Option<i64>,
    started_at: Option<String>,
    completed_at: Option<String>,
    mission_id: String,
    assigned_to: Option<String>,
}

fn read_task_row(r: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: r.get(0)?,
        title: r.get(1)?,
        category: r.get(2)?,
        status: r.get(3)?,
        estimated_minutes: r.get(4)?,
        actual_minutes: r.get(5)?,
        started_at: r.get(6)?,
        completed_at: r.get(7)?,
        mission_id: r.get(8)?,
        assigned_to: r.get(9)?,
    })
}

fn task_from_row(row: TaskRow) -> Result<Task> {
    Ok(Task {
        id: row.id,
        title: row.title,
        category: row.category,
        status: row.status.parse().map_err(EnarvaError::Internal)?,
        estimated_minutes: row.estimated_minutes,
        actual_minutes: row.actual_minutes,
        started_at: opt_ts_from_sql(row.started_at)?,
        completed_at: opt_ts_from_sql(row.completed_at)?,
        mission_id: row.mission_id,
        assigned_to: row.assigned_to,
    })
}
