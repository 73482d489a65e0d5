use super::proposer::Proposer;
use super::types::ActionProposal;
use crate::security::{ValidationResult, Validator, format_rejection_message};
use crate::telemetry::RiskReport;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;


/// Upper bound on attempts per session, whatever the caller asks for.
pub const MAX_RETRIES_HARD_CAP: u32 = 10;

/// One propose/validate round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    #[serde(rename = "command")]
    pub proposal: ActionProposal,
    pub validation: ValidationResult,
    pub latency_ms: u64,
}

/// Terminal result of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum LoopOutcome {
    #[serde(rename = "EXECUTED")]
    Executed {
        session_id: String,
        #[serde(rename = "final_command")]
        final_proposal: ActionProposal,
        attempts: u32,
        attempts_log: Vec<AttemptRecord>,
    },
    #[serde(rename = "MANUAL_OVERRIDE_REQUIRED")]
    ManualOverrideRequired {
        session_id: String,
        reason: String,
        #[serde(rename = "last_blocked_command")]
        last_blocked_proposal: ActionProposal,
        attempts: u32,
        attempts_log: Vec<AttemptRecord>,
    },
}

impl LoopOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Executed { .. } => "EXECUTED",
            Self::ManualOverrideRequired { .. } => "MANUAL_OVERRIDE_REQUIRED",
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            Self::Executed { session_id, .. } | Self::ManualOverrideRequired { session_id, .. } => {
                session_id
            }
        }
    }

    pub fn attempts_log(&self) -> &[AttemptRecord] {
        match self {
            Self::Executed { attempts_log, .. }
            | Self::ManualOverrideRequired { attempts_log, .. } => attempts_log,
        }
    }

    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }
}

pub fn manual_override_reason(attempts: u32) -> String {
    format!(
        "Commander failed to produce a safe plan after {attempts} attempts. Human intervention required."
    )
}

/// Propose, validate, and feed rejections back until a proposal passes or
/// the attempt budget runs out.
pub struct DecisionLoop {
    proposer: Arc<dyn Proposer>,
    validator: Arc<Validator>,
}

impl DecisionLoop {
    pub fn new(proposer: Arc<dyn Proposer>, validator: Arc<Validator>) -> Self {
        Self {
            proposer,
            validator,
        }
    }

    pub fn proposer_name(&self) -> &str {
        self.proposer.name()
    }

    /// `max_retries` is clamped to `1..=MAX_RETRIES_HARD_CAP`.
    pub async fn run_session(
        &self,
        risk: &RiskReport,
        session_id: &str,
        max_retries: u32,
    ) -> LoopOutcome {
        let budget = max_retries.clamp(1, MAX_RETRIES_HARD_CAP);
        let mut attempts_log: Vec<AttemptRecord> = Vec::with_capacity(budget as usize);
        let mut rejection: Option<String> = None;

        for attempt in 1..=budget {
            let started = Instant::now();
            let proposal = self.proposer.propose(risk, rejection.as_deref()).await;
            let validation = self.validator.validate(&proposal, session_id).await;
            let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            let valid = validation.valid;
            let record = AttemptRecord {
                attempt,
                proposal: proposal.clone(),
                validation,
                latency_ms,
            };

            if valid {
                tracing::info!(
                    session_id,
                    attempt,
                    source = %record.validation.source,
                    action = %proposal.action,
                    "proposal accepted"
                );
                attempts_log.push(record);
                return LoopOutcome::Executed {
                    session_id: session_id.to_string(),
                    final_proposal: proposal,
                    attempts: attempt,
                    attempts_log,
                };
            }

            tracing::warn!(
                session_id,
                attempt,
                budget,
                source = %record.validation.source,
                tags = ?record.validation.violation_tags,
                "proposal rejected"
            );
            rejection = Some(format_rejection_message(&record.validation.violation_tags));
            attempts_log.push(record);
        }

        let last_blocked_proposal = attempts_log
            .last()
            .map_or_else(ActionProposal::safety_fallback, |r| r.proposal.clone());
        tracing::error!(session_id, budget, "attempts exhausted; manual override required");

        LoopOutcome::ManualOverrideRequired {
            session_id: session_id.to_string(),
            reason: manual_override_reason(budget),
            last_blocked_proposal,
            attempts: budget,
            attempts_log,
        }
    }
}
