//! Axum-based HTTP gateway over the mission service.
//!
//! - Request body size limits (64KB max)
//! - Request timeouts sized to the configured decision-session budget
//!   (never below 60s); `/act` sessions run on their own task and always
//!   finish and record their event even if the client is timed out
//! - JSON error bodies for malformed requests

mod handlers;

use handlers::{
    handle_act, handle_health, handle_history, handle_insights, handle_reset, handle_restore,
    handle_scan, handle_state,
};

use crate::agent::{MAX_RETRIES_HARD_CAP, Mission};
use crate::config::Config;
use crate::telemetry::RiskReport;
use anyhow::Result;
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout floor (60s)
pub const REQUEST_TIMEOUT_SECS: u64 = 60;
/// Slack on top of the worst-case session for scan, persist and logging.
pub const SESSION_MARGIN_SECS: u64 = 30;

/// Worst-case wall time of one `/act` session: every attempt spends its full
/// proposer and policy timeouts.
pub fn session_budget(config: &Config) -> Duration {
    let attempts = u64::from(config.decision.max_retries.clamp(1, MAX_RETRIES_HARD_CAP));
    let per_attempt = config
        .proposer
        .timeout_secs
        .saturating_add(config.policy.timeout_secs);
    Duration::from_secs(attempts.saturating_mul(per_attempt))
}

/// Route timeout: the session budget plus margin, at least 60s.
pub fn request_timeout(config: &Config) -> Duration {
    (session_budget(config) + Duration::from_secs(SESSION_MARGIN_SECS))
        .max(Duration::from_secs(REQUEST_TIMEOUT_SECS))
}

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub mission: Arc<Mission>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(mission: Arc<Mission>) -> Self {
        Self {
            mission,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// POST /scan request body
#[derive(Debug, Deserialize)]
pub struct ScanBody {
    pub satellite_id: String,
    #[serde(default)]
    pub simulate_danger: bool,
    #[serde(default)]
    pub tle_line1: Option<String>,
    #[serde(default)]
    pub tle_line2: Option<String>,
}

/// POST /act request body
#[derive(Debug, Deserialize)]
pub struct ActBody {
    pub risk_data: RiskReport,
    #[serde(default)]
    pub session_id: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    let timeout = state.request_timeout;
    Router::new()
        .route("/health", get(handle_health))
        .route("/scan", post(handle_scan))
        .route("/act", post(handle_act))
        .route("/state", get(handle_state))
        .route("/restore", post(handle_restore))
        .route("/history", get(handle_history))
        .route("/state/reset", post(handle_reset))
        .route("/insights", get(handle_insights))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
}

/// Run the HTTP gateway.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    run_gateway_with_listener(host, listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let actual_port = listener.local_addr()?.port();
    let mission = Arc::new(Mission::from_config(&config).await);
    let timeout = request_timeout(&config);

    println!("◆ orbitwarden gateway listening on http://{host}:{actual_port}");
    println!("  GET  /health");
    println!("  POST /scan         {{\"satellite_id\": \"ISS\", \"simulate_danger\": false}}");
    println!("  POST /act          {{\"risk_data\": {{...}}, \"session_id\": \"...\"}}");
    println!("  GET  /state   POST /restore   GET /history   POST /state/reset");
    println!("  GET  /insights");
    println!("  Press Ctrl+C to stop.\n");
    tracing::info!(
        host,
        port = actual_port,
        timeout_secs = timeout.as_secs(),
        "gateway started"
    );

    let app = build_router(AppState::new(mission).with_request_timeout(timeout));
    axum::serve(listener, app).await?;

    Ok(())
}
