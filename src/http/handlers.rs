use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use super::extract::ApiJson;
use crate::auth::Actor;
use crate::error::Result;
use crate::mission::{MissionStatus, TaskStatus};
use crate::quality::QualityCheckPatch;
use crate::workflow::{CreateMissionRequest, CreateQualityCheckRequest, CreateTaskRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetMissionStatusBody {
    pub status: MissionStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetTaskStatusBody {
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssignTaskBody {
    pub member_id: String,
}

pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn create_mission(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(req): ApiJson<CreateMissionRequest>,
) -> Result<impl IntoResponse> {
    let mission = state.workflow.create_mission(req, &actor)?;
    Ok((StatusCode::CREATED, Json(mission)))
}

pub async fn get_mission(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let detail = state.workflow.mission_detail(&id, &actor)?;
    Ok(Json(detail))
}

pub async fn add_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    let task = state.workflow.add_task(&id, req, &actor)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn start_mission(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let mission = state.workflow.start_mission(&id, &actor)?;
    Ok(Json(mission))
}

pub async fn set_mission_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SetMissionStatusBody>,
) -> Result<impl IntoResponse> {
    let mission =
        state
            .workflow
            .set_mission_status(&id, body.status, body.notes.as_deref(), &actor)?;
    Ok(Json(mission))
}

pub async fn set_task_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SetTaskStatusBody>,
) -> Result<impl IntoResponse> {
    let task = state.workflow.set_task_status(&id, body.status, &actor)?;
    Ok(Json(task))
}

pub async fn assign_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AssignTaskBody>,
) -> Result<impl IntoResponse> {
    let task = state.workflow.assign_task(&id, &body.member_id, &actor)?;
    Ok(Json(task))
}

pub async fn create_quality_check(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(req): ApiJson<CreateQualityCheckRequest>,
) -> Result<impl IntoResponse> {
    let check = state.workflow.create_quality_check(req, &actor)?;
    Ok((StatusCode::CREATED, Json(check)))
}

pub async fn update_quality_check(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<QualityCheckPatch>,
) -> Result<impl IntoResponse> {
    let check = state.workflow.update_quality_check(&id, patch, &actor)?;
    Ok(Json(check))
}

pub async fn pending_quality_checks(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse> {
    let missions = state.workflow.pending_quality_checks(&actor)?;
    Ok(Json(missions))
}
