mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use enarva_os::http::{AppState, router};
use enarva_os::mission::MissionStatus;

fn app(env: &TestEnv) -> Router {
    router(AppState {
        db: env.db.clone(),
        workflow: env.workflow.clone(),
    })
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn test_healthz_is_open() {
    let env = env();
    let response = app(&env)
        .oneshot(request("GET", "/healthz", None, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_401() {
    let env = env();
    let mission = schedule_mission(&env);

    let response = app(&env)
        .oneshot(request(
            "PATCH",
            &format!("/missions/{}/start", mission.id),
            None,
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_token_is_401() {
    let env = env();
    let mission = schedule_mission(&env);

    let response = app(&env)
        .oneshot(request(
            "PATCH",
            &format!("/missions/{}/start", mission.id),
            Some("token-forged"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unrelated_caller_is_403() {
    let env = env();
    let mission = schedule_mission(&env);

    let response = app(&env)
        .oneshot(request(
            "PATCH",
            &format!("/missions/{}/start", mission.id),
            Some("token-outsider"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_missing_mission_is_404() {
    let env = env();
    let response = app(&env)
        .oneshot(request(
            "PATCH",
            "/missions/m-missing/start",
            Some("token-admin"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_twice_is_409_with_current_status() {
    let env = env();
    let mission = schedule_mission(&env);
    let app = app(&env);

    let first = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/missions/{}/start", mission.id),
            Some("token-admin"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(request(
            "PATCH",
            &format!("/missions/{}/start", mission.id),
            Some("token-admin"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = body_json(second).await;
    assert_eq!(body["error"]["code"], "INVALID_STATE");
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message")
            .contains("IN_PROGRESS")
    );
}

#[tokio::test]
async fn test_out_of_enum_status_is_400() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);

    let response = app(&env)
        .oneshot(request(
            "PATCH",
            &format!("/tasks/{}/status", tasks[0].id),
            Some("token-admin"),
            Some(json!({ "status": "DONE" })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_create_start_and_fetch_mission() {
    let env = env();
    let app = app(&env);

    let created = app
        .clone()
        .oneshot(request(
            "POST",
            "/missions",
            Some("token-admin"),
            Some(json!({
                "leadId": "l-1",
                "address": "12 Rue des Fleurs, Rabat",
                "scheduledAt": "2026-09-01T09:00:00Z",
                "teamLeaderId": LEADER,
                "teamId": "t-1",
            })),
        ))
        .await
        .expect("response");
    assert_eq!(created.status(), StatusCode::CREATED);
    let mission = body_json(created).await;
    let mission_id = mission["id"].as_str().expect("id").to_string();
    assert_eq!(mission["status"], "SCHEDULED");

    let task = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/missions/{mission_id}/tasks"),
            Some("token-admin"),
            Some(json!({ "title": "Dust shelving", "assignedTo": AGENT })),
        ))
        .await
        .expect("response");
    assert_eq!(task.status(), StatusCode::CREATED);

    let started = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/missions/{mission_id}/start"),
            Some("token-leader"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(started.status(), StatusCode::OK);
    let started = body_json(started).await;
    assert_eq!(started["status"], "IN_PROGRESS");
    assert!(started["actual_start_time"].is_string());

    let detail = app
        .oneshot(request(
            "GET",
            &format!("/missions/{mission_id}"),
            Some("token-agent"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(detail.status(), StatusCode::OK);
    let detail = body_json(detail).await;
    assert_eq!(detail["tasks"].as_array().expect("tasks").len(), 1);
    assert_eq!(detail["tasks"][0]["status"], "IN_PROGRESS");
}

#[tokio::test]
async fn test_set_status_with_notes() {
    let env = env();
    let mission = schedule_mission(&env);

    let response = app(&env)
        .oneshot(request(
            "PATCH",
            &format!("/missions/{}/status", mission.id),
            Some("token-admin"),
            Some(json!({ "status": "COMPLETED", "notes": "validated by phone" })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "COMPLETED");
    assert!(body["actual_end_time"].is_string());
    assert_eq!(body["admin_notes"], "validated by phone");
}

#[tokio::test]
async fn test_assign_task_endpoint() {
    let env = env();
    let mission = schedule_mission(&env);
    let tasks = add_tasks(&env, &mission.id, 1);

    let response = app(&env)
        .oneshot(request(
            "PATCH",
            &format!("/tasks/{}/assign", tasks[0].id),
            Some("token-leader"),
            Some(json!({ "memberId": MANAGER })),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["assigned_to"], MANAGER);
}

#[tokio::test]
async fn test_quality_check_endpoints() {
    let env = env();
    let mission = schedule_mission(&env);
    let app = app(&env);

    let created = app
        .clone()
        .oneshot(request(
            "POST",
            "/quality-checks",
            Some("token-leader"),
            Some(json!({
                "missionId": mission.id,
                "type": "FINAL_INSPECTION",
                "notes": "first pass",
            })),
        ))
        .await
        .expect("response");
    assert_eq!(created.status(), StatusCode::CREATED);
    let check = body_json(created).await;
    let check_id = check["id"].as_str().expect("id").to_string();
    assert_eq!(check["status"], "PENDING");

    assert_eq!(
        reload_mission(&env, &mission.id).status,
        MissionStatus::QualityCheck
    );

    let updated = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/quality-checks/{check_id}"),
            Some("token-leader"),
            Some(json!({ "status": "PASSED", "score": 4 })),
        ))
        .await
        .expect("response");
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body_json(updated).await;
    assert_eq!(updated["status"], "PASSED");
    assert_eq!(updated["validated_by"], LEADER);

    let worklist = app
        .oneshot(request(
            "GET",
            "/missions/pending-quality-checks",
            Some("token-agent"),
            None,
        ))
        .await
        .expect("response");
    assert_eq!(worklist.status(), StatusCode::OK);
}
