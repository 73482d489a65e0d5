use crate::error::WardenError;
use crate::telemetry::ScanRequest;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use super::{ActBody, AppState, ScanBody};

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({"error": message.into()}))).into_response()
}

fn warden_error_response(err: &WardenError) -> Response {
    let message = match err {
        WardenError::Risk(e) => format!("Orbit propagation failed: {e}"),
        WardenError::State(e) => format!("State persistence failed: {e}"),
        other => other.to_string(),
    };
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn ok_json<T: serde::Serialize>(value: &T) -> Response {
    match serde_json::to_value(value) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("encode: {e}")),
    }
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "orbitwarden"}))
}

/// POST /scan: assess conjunction risk for one satellite
pub(super) async fn handle_scan(
    State(state): State<AppState>,
    body: Result<Json<ScanBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {e}. Expected: {{\"satellite_id\": \"...\"}}"),
            );
        }
    };

    let mut request = ScanRequest::new(body.satellite_id).critical(body.simulate_danger);
    if let (Some(line1), Some(line2)) = (body.tle_line1, body.tle_line2) {
        request.tle = Some((line1, line2));
    }

    match state.mission.scan(&request).await {
        Ok(report) => ok_json(&report),
        Err(e) => warden_error_response(&e),
    }
}

/// POST /act: run the propose/validate loop against a risk report
pub(super) async fn handle_act(
    State(state): State<AppState>,
    body: Result<Json<ActBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {e}. Expected: {{\"risk_data\": {{...}}}}"),
            );
        }
    };

    // Detached so a timed-out or disconnected client cannot cut a session
    // off between persisting a maneuver and recording its event.
    let mission = state.mission.clone();
    let session = tokio::spawn(async move {
        mission
            .act(&body.risk_data, body.session_id.as_deref())
            .await
    });

    match session.await {
        Ok(Ok(report)) => ok_json(&report),
        Ok(Err(e)) => warden_error_response(&e),
        Err(e) => {
            tracing::error!("decision session task failed: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Decision session aborted",
            )
        }
    }
}

/// GET /state
pub(super) async fn handle_state(State(state): State<AppState>) -> Response {
    ok_json(&state.mission.state().await)
}

/// POST /restore
pub(super) async fn handle_restore(State(state): State<AppState>) -> Response {
    match state.mission.restore().await {
        Ok(report) => ok_json(&report),
        Err(e) => warden_error_response(&e),
    }
}

/// GET /history
pub(super) async fn handle_history(State(state): State<AppState>) -> Response {
    ok_json(&state.mission.history().await)
}

/// POST /state/reset
pub(super) async fn handle_reset(State(state): State<AppState>) -> Response {
    match state.mission.reset().await {
        Ok(view) => ok_json(&view),
        Err(e) => warden_error_response(&e),
    }
}

/// GET /insights
pub(super) async fn handle_insights(State(state): State<AppState>) -> Response {
    match state.mission.insights().await {
        Ok(insights) => ok_json(&insights),
        Err(e) => warden_error_response(&e),
    }
}
