//! Append-only activity/audit log.
//!
//! `record` is best-effort: a failed append is reported at warn level and
//! never surfaces to the caller, so audit logging cannot fail the state
//! change that caused it. Rows are only ever removed by the retention
//! sweep.

mod types;

use chrono::{Duration, Utc};
use rusqlite::params;
use tracing::warn;

use crate::db::{Database, ts_from_sql, ts_to_sql};
use crate::error::{EnarvaError, Result};

pub use types::{Activity, ActivityEntry, ActivityType};

#[derive(Clone)]
pub struct ActivityLog {
    db: Database,
}

impl ActivityLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Appends one activity row. Never returns an error.
    pub fn record(&self, entry: ActivityEntry) {
        if let Err(e) = self.try_record(&entry) {
            warn!(
                activity_type = entry.activity_type.as_str(),
                error = %e,
                "Failed to append activity record"
            );
        }
    }

    fn try_record(&self, entry: &ActivityEntry) -> Result<()> {
        let metadata = entry
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO activities
                 (id, activity_type, title, description, created_at, user_id, lead_id, mission_id, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    uuid::Uuid::new_v4().to_string(),
                    entry.activity_type.as_str(),
                    entry.title,
                    entry.description,
                    ts_to_sql(&Utc::now()),
                    entry.user_id,
                    entry.lead_id,
                    entry.mission_id,
                    metadata,
                ],
            )?;
            Ok(())
        })
    }

    /// Activities for one mission, newest first.
    pub fn for_mission(&self, mission_id: &str) -> Result<Vec<Activity>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, activity_type, title, description, created_at, user_id, lead_id, mission_id, metadata
                 FROM activities WHERE mission_id = ?1 ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map(params![mission_id], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, Option<String>>(6)?,
                    r.get::<_, Option<String>>(7)?,
                    r.get::<_, Option<String>>(8)?,
                ))
            })?;

            let mut out = Vec::new();
            for row in rows {
                let (id, kind, title, description, created_at, user_id, lead_id, mission_id, metadata) =
                    row?;
                let activity_type = ActivityType::parse(&kind)
                    .ok_or_else(|| EnarvaError::Internal(format!("unknown activity type: {kind}")))?;
                out.push(Activity {
                    id,
                    activity_type,
                    title,
                    description,
                    created_at: ts_from_sql(&created_at)?,
                    user_id,
                    lead_id,
                    mission_id,
                    metadata: metadata.as_deref().map(serde_json::from_str).transpose()?,
                });
            }
            // RFC3339 text ordering matches chronological order only within
            // one UTC offset; re-sort on the parsed timestamps to be exact.
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        })
    }

    /// Deletes activities older than `retention_days`. Returns the number
    /// of rows removed. Independent of the mission lifecycle.
    pub fn sweep(&self, retention_days: u32) -> Result<usize> {
        let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
        self.db.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM activities WHERE created_at < ?1",
                params![ts_to_sql(&cutoff)],
            )?;
            Ok(n)
        })
    }
}
