//! SQLite datastore.
//!
//! The `Database` handle is constructed explicitly by the process entry
//! point and injected into everything that needs it. One mutex-guarded
//! connection serializes access; multi-row writes go through `with_tx`
//! for all-or-nothing commit.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::error::{EnarvaError, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id      TEXT PRIMARY KEY,
    name    TEXT NOT NULL,
    role    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token   TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS leads (
    id      TEXT PRIMARY KEY,
    name    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    id      TEXT PRIMARY KEY,
    name    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS team_members (
    id      TEXT PRIMARY KEY,
    team_id TEXT NOT NULL REFERENCES teams(id),
    user_id TEXT NOT NULL REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS missions (
    id                      TEXT PRIMARY KEY,
    mission_number          TEXT NOT NULL UNIQUE,
    status                  TEXT NOT NULL,
    priority                TEXT NOT NULL,
    mission_type            TEXT NOT NULL,
    scheduled_at            TEXT NOT NULL,
    estimated_duration_mins INTEGER,
    actual_start_time       TEXT,
    actual_end_time         TEXT,
    address                 TEXT NOT NULL,
    admin_notes             TEXT,
    lead_id                 TEXT NOT NULL REFERENCES leads(id),
    team_leader_id          TEXT REFERENCES users(id),
    team_id                 TEXT REFERENCES teams(id)
);

CREATE TABLE IF NOT EXISTS tasks (
    id                TEXT PRIMARY KEY,
    title             TEXT NOT NULL,
    category          TEXT NOT NULL,
    status            TEXT NOT NULL,
    estimated_minutes INTEGER,
    actual_minutes    INTEGER,
    started_at        TEXT,
    completed_at      TEXT,
    mission_id        TEXT NOT NULL REFERENCES missions(id),
    assigned_to       TEXT REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_tasks_mission ON tasks(mission_id);

CREATE TABLE IF NOT EXISTS quality_checks (
    id           TEXT PRIMARY KEY,
    mission_id   TEXT NOT NULL REFERENCES missions(id),
    check_type   TEXT NOT NULL,
    status       TEXT NOT NULL,
    score        INTEGER,
    notes        TEXT,
    photos       TEXT NOT NULL DEFAULT '[]',
    issues       TEXT NOT NULL DEFAULT '[]',
    corrections  TEXT NOT NULL DEFAULT '[]',
    checked_by   TEXT NOT NULL REFERENCES users(id),
    validated_by TEXT REFERENCES users(id),
    validated_at TEXT,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quality_checks_mission ON quality_checks(mission_id);

CREATE TABLE IF NOT EXISTS activities (
    id            TEXT PRIMARY KEY,
    activity_type TEXT NOT NULL,
    title         TEXT NOT NULL,
    description   TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    user_id       TEXT NOT NULL,
    lead_id       TEXT,
    mission_id    TEXT,
    metadata      TEXT
);

CREATE INDEX IF NOT EXISTS idx_activities_created ON activities(created_at);
"#;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::init(conn)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        debug!("Database schema initialized");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection for single-statement reads/writes.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Runs `f` inside a transaction. The transaction commits only if `f`
    /// returns `Ok`; any error rolls back every write made inside it.
    pub fn with_tx<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

/// Timestamps are stored as RFC3339 TEXT columns.
pub fn ts_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub fn ts_from_sql(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EnarvaError::Internal(format!("bad timestamp '{raw}': {e}")))
}

pub fn opt_ts_from_sql(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.as_deref().map(ts_from_sql).transpose()
}
