use rusqlite::{Connection, OptionalExtension, params};

use super::{Actor, Role};
use crate::error::{EnarvaError, Result};

pub fn insert_user(conn: &Connection, id: &str, name: &str, role: Role) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, role) VALUES (?1, ?2, ?3)",
        params![id, name, role.as_str()],
    )?;
    Ok(())
}

pub fn insert_session(conn: &Connection, token: &str, user_id: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, user_id) VALUES (?1, ?2)",
        params![token, user_id],
    )?;
    Ok(())
}

pub fn insert_team_member(conn: &Connection, id: &str, team_id: &str, user_id: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO team_members (id, team_id, user_id) VALUES (?1, ?2, ?3)",
        params![id, team_id, user_id],
    )?;
    Ok(())
}

pub fn find_user(conn: &Connection, id: &str) -> Result<Option<Actor>> {
    let row = conn
        .query_row(
            "SELECT id, name, role FROM users WHERE id = ?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, name, role)| actor_from_row(id, name, &role))
        .transpose()
}

/// Resolves a bearer token to its user. The sessions table is the seam to
/// the external identity provider.
pub fn find_actor_by_token(conn: &Connection, token: &str) -> Result<Option<Actor>> {
    let row = conn
        .query_row(
            "SELECT u.id, u.name, u.role
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token = ?1",
            params![token],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, name, role)| actor_from_row(id, name, &role))
        .transpose()
}

fn actor_from_row(id: String, name: String, role: &str) -> Result<Actor> {
    let role = role
        .parse::<Role>()
        .map_err(EnarvaError::Internal)?;
    Ok(Actor { id, name, role })
}
