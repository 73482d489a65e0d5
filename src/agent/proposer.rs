use super::prompt::{build_decision_request, parse_decision};
use super::types::{ActionProposal, ManeuverAction, ThrustDirection};
use crate::config::ProposerConfig;
use crate::llm::{Provider, create_provider};
use crate::telemetry::{BurnPlan, RiskReport, plan_avoidance_burn};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Produces a candidate action for a risk report. Never fails: any backend
/// problem yields [`ActionProposal::safety_fallback`].
#[async_trait]
pub trait Proposer: Send + Sync {
    fn name(&self) -> &str;

    async fn propose(&self, risk: &RiskReport, prior_rejection: Option<&str>) -> ActionProposal;
}

// ── LLM-backed ───────────────────────────────────────────────────────────────

pub struct LlmProposer {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl LlmProposer {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.2,
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Proposer for LlmProposer {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn propose(&self, risk: &RiskReport, prior_rejection: Option<&str>) -> ActionProposal {
        let request = build_decision_request(risk, prior_rejection);
        let call = self.provider.chat_with_system(
            Some(&request.system_prompt),
            &request.user_message,
            &self.model,
            self.temperature,
        );

        let raw = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                tracing::warn!(provider = self.provider.name(), "proposer call failed: {e:#}");
                return ActionProposal::safety_fallback();
            }
            Err(_) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    timeout = ?self.timeout,
                    "proposer call timed out"
                );
                return ActionProposal::safety_fallback();
            }
        };

        parse_decision(&raw).unwrap_or_else(|e| {
            tracing::warn!(provider = self.provider.name(), "unusable decision: {e:#}");
            ActionProposal::safety_fallback()
        })
    }
}

// ── Rule-based ───────────────────────────────────────────────────────────────

/// Offline proposer applying the probability threshold directly.
pub struct RuleBasedProposer {
    fuel_pct: f64,
}

impl Default for RuleBasedProposer {
    fn default() -> Self {
        Self { fuel_pct: 100.0 }
    }
}

impl RuleBasedProposer {
    pub fn with_fuel(fuel_pct: f64) -> Self {
        Self { fuel_pct }
    }
}

#[async_trait]
impl Proposer for RuleBasedProposer {
    fn name(&self) -> &str {
        "rules"
    }

    async fn propose(&self, risk: &RiskReport, prior_rejection: Option<&str>) -> ActionProposal {
        let p = risk.collision_probability;

        // A rejected burn degrades to holding position.
        if prior_rejection.is_some() {
            return ActionProposal::new(
                ManeuverAction::HoldPosition,
                "Holding position after the previous command was rejected by the validator.",
                0.5,
                ThrustDirection::None,
            );
        }

        match plan_avoidance_burn(p, self.fuel_pct) {
            BurnPlan::Burn {
                delta_v_ms,
                burn_duration_sec,
                ..
            } => ActionProposal::new(
                ManeuverAction::FireThrusters,
                format!(
                    "Collision probability {p} exceeds the threshold, so a {delta_v_ms} m/s prograde burn over {burn_duration_sec} s is required."
                ),
                p,
                ThrustDirection::Prograde,
            ),
            BurnPlan::Alert { reason } => ActionProposal::new(
                ManeuverAction::HoldPosition,
                reason,
                0.5,
                ThrustDirection::None,
            ),
            BurnPlan::NoAction { .. } => ActionProposal::new(
                ManeuverAction::HoldPosition,
                format!("Collision probability {p} is within tolerance, so no maneuver is needed."),
                1.0 - p,
                ThrustDirection::None,
            ),
        }
    }
}

/// LLM proposer when a backend is configured, otherwise the rule-based one.
pub fn create_proposer(config: &ProposerConfig) -> Arc<dyn Proposer> {
    match create_provider(config) {
        Some(provider) => {
            tracing::info!(provider = provider.name(), model = %config.model, "using LLM proposer");
            Arc::new(
                LlmProposer::new(provider, &config.model)
                    .with_temperature(config.temperature)
                    .with_timeout(Duration::from_secs(config.timeout_secs)),
            )
        }
        None => {
            tracing::info!("no LLM backend configured; using rule-based proposer");
            Arc::new(RuleBasedProposer::default())
        }
    }
}
