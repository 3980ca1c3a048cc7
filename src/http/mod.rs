//! HTTP surface.
//!
//! Thin axum handlers over the workflow services. All endpoints require a
//! bearer session token; failures map to the JSON error contract
//! `{ "error": { "code", "message" } }`.

mod extract;
mod handlers;
mod response;

use axum::Router;
use axum::routing::{get, patch, post, put};

use crate::db::Database;
use crate::workflow::Workflow;

pub use extract::ApiJson;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub workflow: Workflow,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/missions", post(handlers::create_mission))
        .route(
            "/missions/pending-quality-checks",
            get(handlers::pending_quality_checks),
        )
        .route("/missions/{id}", get(handlers::get_mission))
        .route("/missions/{id}/tasks", post(handlers::add_task))
        .route("/missions/{id}/start", patch(handlers::start_mission))
        .route("/missions/{id}/status", patch(handlers::set_mission_status))
        .route("/tasks/{id}/status", patch(handlers::set_task_status))
        .route("/tasks/{id}/assign", patch(handlers::assign_task))
        .route("/quality-checks", post(handlers::create_quality_check))
        .route("/quality-checks/{id}", put(handlers::update_quality_check))
        .with_state(state)
}
