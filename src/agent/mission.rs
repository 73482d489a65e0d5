use super::decision_loop::{DecisionLoop, LoopOutcome};
use super::proposer::create_proposer;
use crate::config::Config;
use crate::error::{Result, WardenError};
use crate::learning::{EventLog, EventType, Insights, summarize};
use crate::security::Validator;
use crate::state::{ManeuverRecord, SpacecraftState, StateStore};
use crate::telemetry::simulated::{SCENARIO_LIVE, SCENARIO_SYNTHETIC};
use crate::telemetry::{RiskReport, RiskSource, ScanRequest, SimulatedRiskSource};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;

/// Twelve hex characters of a v4 UUID.
pub fn new_session_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// ── Reports ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub satellite_id: String,
    pub risk_data: RiskReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActReport {
    #[serde(flatten)]
    pub outcome: LoopOutcome,
    pub state_saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<SpacecraftState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateView {
    #[serde(flatten)]
    pub state: SpacecraftState,
    pub has_original_trajectory: bool,
    pub maneuver_count: usize,
}

impl From<SpacecraftState> for StateView {
    fn from(state: SpacecraftState) -> Self {
        Self {
            has_original_trajectory: state.has_original_trajectory(),
            maneuver_count: state.maneuver_count(),
            state,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestoreReport {
    pub restored: bool,
    pub message: String,
    pub state: SpacecraftState,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub maneuver_history: Vec<ManeuverRecord>,
    pub total_maneuvers: usize,
}

// ── Mission ──────────────────────────────────────────────────────────────────

/// Owns every collaborator and runs the scan/act/state operations exposed by
/// the gateway and the CLI.
pub struct Mission {
    risk_source: Arc<dyn RiskSource>,
    decision_loop: DecisionLoop,
    state: StateStore,
    events: EventLog,
    max_retries: u32,
    insights_window: usize,
}

impl Mission {
    pub fn new(
        risk_source: Arc<dyn RiskSource>,
        decision_loop: DecisionLoop,
        state: StateStore,
        events: EventLog,
    ) -> Self {
        Self {
            risk_source,
            decision_loop,
            state,
            events,
            max_retries: 3,
            insights_window: 800,
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_insights_window(mut self, window: usize) -> Self {
        self.insights_window = window.max(1);
        self
    }

    pub async fn from_config(config: &Config) -> Self {
        let risk_source = Arc::new(SimulatedRiskSource::new(config.telemetry.clone()));
        let validator = Arc::new(Validator::from_config(&config.policy));
        let decision_loop = DecisionLoop::new(create_proposer(&config.proposer), validator);
        let state = StateStore::open(config.state_path()).await;
        let events = EventLog::new(config.events_path());

        tracing::info!(
            risk_source = risk_source.name(),
            proposer = decision_loop.proposer_name(),
            state = %state.path().display(),
            "mission initialized"
        );

        Self::new(risk_source, decision_loop, state, events)
            .with_max_retries(config.decision.max_retries)
            .with_insights_window(config.storage.insights_window)
    }

    async fn record(&self, event_type: EventType, payload: Value) {
        if let Err(e) = self.events.append(event_type, payload).await {
            tracing::warn!(event = %event_type, "event log append failed: {e}");
        }
    }

    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanReport> {
        let started = Instant::now();
        match self.risk_source.assess(request).await {
            Ok(risk) => {
                self.record(
                    EventType::Scan,
                    json!({
                        "satellite_id": request.satellite_id,
                        "status": risk.status,
                        "collision_probability": risk.collision_probability,
                        "scenario_mode": risk.scenario_mode,
                        "latency_ms": elapsed_ms(started),
                    }),
                )
                .await;
                Ok(ScanReport {
                    satellite_id: request.satellite_id.clone(),
                    risk_data: risk,
                })
            }
            Err(e) => {
                tracing::error!(satellite = %request.satellite_id, "risk assessment failed: {e}");
                let scenario = if request.force_critical {
                    SCENARIO_SYNTHETIC
                } else {
                    SCENARIO_LIVE
                };
                self.record(
                    EventType::Scan,
                    json!({
                        "satellite_id": request.satellite_id,
                        "status": "ERROR",
                        "error": e.to_string(),
                        "scenario_mode": scenario,
                        "latency_ms": elapsed_ms(started),
                    }),
                )
                .await;
                Err(WardenError::Risk(e))
            }
        }
    }

    /// Run one decision session; an accepted proposal is applied to the
    /// spacecraft state before returning.
    pub async fn act(&self, risk: &RiskReport, session_id: Option<&str>) -> Result<ActReport> {
        let session_id = session_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(new_session_id, str::to_string);
        let started = Instant::now();

        let outcome = self
            .decision_loop
            .run_session(risk, &session_id, self.max_retries)
            .await;

        let applied = match &outcome {
            LoopOutcome::Executed { final_proposal, .. } => {
                Some(self.state.apply_and_persist(risk, final_proposal).await)
            }
            LoopOutcome::ManualOverrideRequired { .. } => None,
        };
        let state_saved = matches!(applied, Some(Ok(_)));

        self.record(
            EventType::Act,
            json!({
                "session_id": session_id,
                "status": outcome.status(),
                "risk_status": risk.status,
                "attempts": outcome.attempts_log().len(),
                "attempts_log": outcome.attempts_log(),
                "state_saved": state_saved,
                "latency_ms": elapsed_ms(started),
            }),
        )
        .await;

        match applied {
            Some(Err(e)) => Err(e.into()),
            Some(Ok(state)) => Ok(ActReport {
                outcome,
                state_saved,
                state: Some(state),
            }),
            None => Ok(ActReport {
                outcome,
                state_saved,
                state: None,
            }),
        }
    }

    pub async fn state(&self) -> StateView {
        self.state.snapshot().await.into()
    }

    pub async fn restore(&self) -> Result<RestoreReport> {
        let (state, restored) = self.state.restore().await?;
        let message = if restored {
            "Original trajectory restored."
        } else {
            "No original trajectory recorded; nothing to restore."
        };
        Ok(RestoreReport {
            restored,
            message: message.to_string(),
            state,
        })
    }

    pub async fn history(&self) -> HistoryView {
        let state = self.state.snapshot().await;
        HistoryView {
            total_maneuvers: state.maneuver_count(),
            maneuver_history: state.maneuver_history,
        }
    }

    pub async fn reset(&self) -> Result<StateView> {
        Ok(self.state.reset().await?.into())
    }

    pub async fn insights(&self) -> Result<Insights> {
        let events = self.events.tail(self.insights_window).await?;
        Ok(summarize(&events))
    }
}
