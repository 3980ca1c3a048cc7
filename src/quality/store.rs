//! SQL persistence for quality checks and the pending worklist query.

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{QualityCheck, QualityStatus};
use crate::db::{opt_ts_from_sql, ts_from_sql, ts_to_sql};
use crate::error::{EnarvaError, Result};
use crate::mission::Mission;

const QC_COLS: &str = "id, mission_id, check_type, status, score, notes, photos, issues, \
     corrections, checked_by, validated_by, validated_at, created_at";

pub fn insert_quality_check(conn: &Connection, check: &QualityCheck) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO quality_checks ({QC_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"),
        params![
            check.id,
            check.mission_id,
            check.check_type,
            check.status.as_str(),
            check.score,
            check.notes,
            serde_json::to_string(&check.photos)?,
            serde_json::to_string(&check.issues)?,
            serde_json::to_string(&check.corrections)?,
            check.checked_by,
            check.validated_by,
            check.validated_at.as_ref().map(ts_to_sql),
            ts_to_sql(&check.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_quality_check(conn: &Connection, id: &str) -> Result<Option<QualityCheck>> {
    let row = conn
        .query_row(
            &format!("SELECT {QC_COLS} FROM quality_checks WHERE id = ?1"),
            params![id],
            read_check_row,
        )
        .optional()?;
    row.map(check_from_row).transpose()
}

pub fn update_quality_check(conn: &Connection, check: &QualityCheck) -> Result<()> {
    conn.execute(
        "UPDATE quality_checks
         SET status = ?2, score = ?3, notes = ?4, photos = ?5, issues = ?6,
             corrections = ?7, validated_by = ?8, validated_at = ?9
         WHERE id = ?1",
        params![
            check.id,
            check.status.as_str(),
            check.score,
            check.notes,
            serde_json::to_string(&check.photos)?,
            serde_json::to_string(&check.issues)?,
            serde_json::to_string(&check.corrections)?,
            check.validated_by,
            check.validated_at.as_ref().map(ts_to_sql),
        ],
    )?;
    Ok(())
}

/// The quality-assurance worklist: missions needing inspection attention.
///
/// Three-way OR, reproduced exactly:
///  (a) mission status is literally QUALITY_CHECK, or
///  (b) all tasks are done (>= 1 task, each COMPLETED or VALIDATED) and no
///      quality check exists yet, or
///  (c) some quality check is PENDING or NEEDS_CORRECTION.
pub fn pending_quality_missions(conn: &Connection) -> Result<Vec<Mission>> {
    let mut stmt = conn.prepare(
        "SELECT m.id FROM missions m
         WHERE m.status = 'QUALITY_CHECK'
            OR (
                EXISTS (SELECT 1 FROM tasks t WHERE t.mission_id = m.id)
                AND NOT EXISTS (
                    SELECT 1 FROM tasks t
                    WHERE t.mission_id = m.id
                      AND t.status NOT IN ('COMPLETED', 'VALIDATED')
                )
                AND NOT EXISTS (SELECT 1 FROM quality_checks q WHERE q.mission_id = m.id)
            )
            OR EXISTS (
                SELECT 1 FROM quality_checks q
                WHERE q.mission_id = m.id
                  AND q.status IN ('PENDING', 'NEEDS_CORRECTION')
            )
         ORDER BY m.scheduled_at",
    )?;
    let ids = stmt
        .query_map([], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut missions = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(mission) = crate::mission::store::get_mission(conn, &id)? {
            missions.push(mission);
        }
    }
    Ok(missions)
}

struct CheckRow {
    id: String,
    mission_id: String,
    check_type: String,
    status: String,
    score: Option<i64>,
    notes: Option<String>,
    photos: String,
    issues: String,
    corrections: String,
    checked_by: String,
    validated_by: Option<String>,
    validated_at: Option<String>,
    created_at: String,
}

fn read_check_row(r: &Row<'_>) -> rusqlite::Result<CheckRow> {
    Ok(CheckRow {
        id: r.get(0)?,
        mission_id: r.get(1)?,
        check_type: r.get(2)?,
        status: r.get(3)?,
        score: r.get(4)?,
        notes: r.get(5)?,
        photos: r.get(6)?,
        issues: r.get(7)?,
        corrections: r.get(8)?,
        checked_by: r.get(9)?,
        validated_by: r.get(10)?,
        validated_at: r.get(11)?,
        created_at: r.get(12)?,
    })
}

fn check_from_row(row: CheckRow) -> Result<QualityCheck> {
    let status: QualityStatus = row.status.parse().map_err(EnarvaError::Internal)?;
    Ok(QualityCheck {
        id: row.id,
        mission_id: row.mission_id,
        check_type: row.check_type,
        status,
        score: row.score,
        notes: row.notes,
        photos: serde_json::from_str(&row.photos)?,
        issues: serde_json::from_str(&row.issues)?,
        corrections: serde_json::from_str(&row.corrections)?,
        checked_by: row.checked_by,
        validated_by: row.validated_by,
        validated_at: opt_ts_from_sql(row.validated_at)?,
        created_at: ts_from_sql(&row.created_at)?,
    })
}
