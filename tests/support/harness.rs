#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use orbitwarden::agent::{ActionProposal, DecisionLoop, Mission, Proposer, ThrustDirection};
use orbitwarden::config::{PolicyConfig, TelemetryConfig};
use orbitwarden::learning::EventLog;
use orbitwarden::security::Validator;
use orbitwarden::state::StateStore;
use orbitwarden::telemetry::{RiskReport, SimulatedRiskSource};

/// Proposer that always answers with the same proposal and counts calls.
pub struct FixedProposer {
    proposal: ActionProposal,
    pub calls: AtomicUsize,
}

impl FixedProposer {
    pub fn new(proposal: ActionProposal) -> Arc<Self> {
        Arc::new(Self {
            proposal,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Proposer for FixedProposer {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn propose(&self, _risk: &RiskReport, _prior_rejection: Option<&str>) -> ActionProposal {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.proposal.clone()
    }
}

pub fn self_destruct() -> ActionProposal {
    ActionProposal::new(
        "SELF_DESTRUCT",
        "Destroy the spacecraft before impact.",
        0.99,
        ThrustDirection::None,
    )
}

pub fn prograde_burn() -> ActionProposal {
    ActionProposal::new(
        "FIRE_THRUSTERS",
        "Collision probability is above threshold; burn prograde.",
        0.9,
        ThrustDirection::Prograde,
    )
}

pub fn policy_config(base_url: &str, timeout_secs: u64) -> PolicyConfig {
    PolicyConfig {
        api_key: Some("policy-test-key".into()),
        deployment_id: Some("dep-test".into()),
        base_url: base_url.to_string(),
        timeout_secs,
        ..PolicyConfig::default()
    }
}

/// Offline risk source: built-in element set, no catalogue fetch.
pub fn offline_source() -> SimulatedRiskSource {
    SimulatedRiskSource::new(TelemetryConfig {
        live_fetch: false,
        ..TelemetryConfig::default()
    })
}

pub async fn mission_in(
    dir: &Path,
    proposer: Arc<dyn Proposer>,
    validator: Validator,
    max_retries: u32,
) -> Mission {
    Mission::new(
        Arc::new(offline_source()),
        DecisionLoop::new(proposer, Arc::new(validator)),
        StateStore::open(dir.join("spacecraft_state.json")).await,
        EventLog::new(dir.join("agent_events.jsonl")),
    )
    .with_max_retries(max_retries)
}
