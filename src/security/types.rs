use crate::agent::ActionProposal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tier that produced a verdict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValidationSource {
    LocalDenyList,
    RemotePolicy,
    Fallback,
}

/// Verdict on one proposal. `valid` implies `violation_tags` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub source: ValidationSource,
    pub violation_tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    #[serde(rename = "original_command")]
    pub proposal: ActionProposal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_session_id: Option<String>,
}

impl ValidationResult {
    pub fn accept(
        source: ValidationSource,
        session_id: impl Into<String>,
        proposal: ActionProposal,
    ) -> Self {
        Self {
            valid: true,
            source,
            violation_tags: Vec::new(),
            timestamp: Utc::now(),
            session_id: session_id.into(),
            proposal,
            policy_session_id: None,
        }
    }

    pub fn reject(
        source: ValidationSource,
        tags: Vec<String>,
        session_id: impl Into<String>,
        proposal: ActionProposal,
    ) -> Self {
        Self {
            valid: false,
            source,
            violation_tags: tags,
            timestamp: Utc::now(),
            session_id: session_id.into(),
            proposal,
            policy_session_id: None,
        }
    }

    #[must_use]
    pub fn with_policy_session(mut self, policy_session_id: Option<String>) -> Self {
        self.policy_session_id = policy_session_id;
        self
    }
}
