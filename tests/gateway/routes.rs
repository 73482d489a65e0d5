use crate::harness::{FixedProposer, mission_in, prograde_burn};
use orbitwarden::gateway::{AppState, build_router};
use orbitwarden::security::Validator;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;

/// Serve the router on an ephemeral port and return its base URL.
async fn spawn_gateway(tmp: &TempDir) -> String {
    let mission = mission_in(
        tmp.path(),
        FixedProposer::new(prograde_burn()),
        Validator::local_only(),
        3,
    )
    .await;
    let app = build_router(AppState::new(Arc::new(mission)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_endpoint() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_gateway(&tmp).await;

    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok", "service": "orbitwarden"}));
}

#[tokio::test]
async fn scan_act_restore_flow() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_gateway(&tmp).await;
    let client = reqwest::Client::new();

    let scan: Value = client
        .post(format!("{base}/scan"))
        .json(&json!({"satellite_id": "25544", "simulate_danger": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(scan["satellite_id"], "25544");
    assert_eq!(scan["risk_data"]["status"], "CRITICAL");

    let act = client
        .post(format!("{base}/act"))
        .json(&json!({"risk_data": scan["risk_data"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(act.status(), reqwest::StatusCode::OK);
    let act: Value = act.json().await.unwrap();
    assert_eq!(act["status"], "EXECUTED");
    assert_eq!(act["session_id"].as_str().unwrap().len(), 12);
    assert_eq!(act["attempts_log"][0]["command"]["action"], "FIRE_THRUSTERS");

    let state: Value = client
        .get(format!("{base}/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state["has_original_trajectory"], true);
    assert_eq!(state["maneuver_count"], 1);

    let restore: Value = client
        .post(format!("{base}/restore"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(restore["restored"], true);
    assert!(restore["state"]["original_trajectory"].is_null());

    let insights: Value = client
        .get(format!("{base}/insights"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(insights["summary"]["scan_events"], 1);
    assert_eq!(insights["summary"]["act_events"], 1);
}

#[tokio::test]
async fn malformed_act_body_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_gateway(&tmp).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/act"))
        .header("content-type", "application/json")
        .body(r#"{"session_id": "x"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("risk_data"));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_gateway(&tmp).await;
    let padding = "x".repeat(70_000);

    let response = reqwest::Client::new()
        .post(format!("{base}/scan"))
        .json(&json!({"satellite_id": padding}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn reset_clears_history() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_gateway(&tmp).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/act"))
        .json(&json!({"risk_data": {"collision_probability": 0.95}, "session_id": "r-1"}))
        .send()
        .await
        .unwrap();
    let reset: Value = client
        .post(format!("{base}/state/reset"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reset["maneuver_count"], 0);

    let history: Value = client
        .get(format!("{base}/history"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["total_maneuvers"], 0);
}
