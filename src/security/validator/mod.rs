use super::deny_list::DenyList;
use super::policy_client::{HttpPolicyClient, PolicyCheckRequest, PolicyClient, PolicyMessage};
use super::types::{ValidationResult, ValidationSource};
use crate::agent::ActionProposal;
use crate::config::PolicyConfig;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;


/// Feedback text handed back to the proposer after a rejection.
pub fn format_rejection_message(tags: &[String]) -> String {
    let joined = if tags.is_empty() {
        "UNKNOWN".to_string()
    } else {
        tags.join(", ")
    };
    format!("SECURITY ALERT: Command blocked due to [{joined}]. Generate a SAFE alternative.")
}

/// Remote tier wiring: the client plus the fields stamped into every check.
pub struct RemotePolicy {
    client: Arc<dyn PolicyClient>,
    deployment_id: String,
    assistant_name: String,
    environment: String,
    timeout: Duration,
}

impl RemotePolicy {
    pub fn new(client: Arc<dyn PolicyClient>, deployment_id: impl Into<String>) -> Self {
        Self {
            client,
            deployment_id: deployment_id.into(),
            assistant_name: "orbitwarden-commander".to_string(),
            environment: "orbitwarden".to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_labels(
        mut self,
        assistant_name: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        self.assistant_name = assistant_name.into();
        self.environment = environment.into();
        self
    }

    fn build_request(&self, content: String, session_id: &str) -> PolicyCheckRequest {
        PolicyCheckRequest {
            deployment_id: self.deployment_id.clone(),
            messages: vec![PolicyMessage {
                role: "assistant",
                content,
                metadata: Some(json!({
                    "assistant": {"model_name": self.assistant_name},
                    "message": {"timestamp": Utc::now().to_rfc3339()},
                })),
            }],
            external_session_id: (!session_id.is_empty()).then(|| session_id.to_string()),
            include_context: false,
            metadata: Some(json!({"environment": {"name": self.environment}})),
        }
    }
}

/// Tier-chain validator: local deny-list, then the remote policy service when
/// configured, then fail-open.
pub struct Validator {
    deny_list: DenyList,
    remote: Option<RemotePolicy>,
}

impl Validator {
    pub fn new(deny_list: DenyList, remote: Option<RemotePolicy>) -> Self {
        Self { deny_list, remote }
    }

    /// Deny-list only.
    pub fn local_only() -> Self {
        Self::new(DenyList::default(), None)
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        let deny_list = DenyList::with_extra(&config.extra_blocked_keywords);
        let remote = HttpPolicyClient::from_config(config).and_then(|client| {
            let deployment_id = config.deployment_id.clone()?;
            Some(
                RemotePolicy::new(Arc::new(client), deployment_id.trim())
                    .with_timeout(Duration::from_secs(config.timeout_secs))
                    .with_labels(&config.assistant_name, &config.environment),
            )
        });
        if remote.is_none() {
            tracing::info!("remote policy tier not configured; deny-list and fallback only");
        }
        Self::new(deny_list, remote)
    }

    pub fn has_remote_tier(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn validate(&self, proposal: &ActionProposal, session_id: &str) -> ValidationResult {
        let serialized = match serde_json::to_string(proposal) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!(session_id, "could not serialize proposal: {e}");
                format!("{proposal:?}")
            }
        };

        let hits = self.deny_list.matches(&serialized);
        if !hits.is_empty() {
            tracing::warn!(session_id, tags = ?hits, "proposal blocked by deny-list");
            return ValidationResult::reject(
                ValidationSource::LocalDenyList,
                hits,
                session_id,
                proposal.clone(),
            );
        }

        if let Some(remote) = &self.remote {
            let request = remote.build_request(serialized, session_id);
            match tokio::time::timeout(remote.timeout, remote.client.check(&request)).await {
                Ok(Ok(response)) => {
                    let result = if response.flagged {
                        let tags = response.violation_tags();
                        tracing::warn!(session_id, tags = ?tags, "proposal flagged by policy service");
                        ValidationResult::reject(
                            ValidationSource::RemotePolicy,
                            tags,
                            session_id,
                            proposal.clone(),
                        )
                    } else {
                        ValidationResult::accept(
                            ValidationSource::RemotePolicy,
                            session_id,
                            proposal.clone(),
                        )
                    };
                    return result.with_policy_session(response.internal_session_id);
                }
                Ok(Err(e)) => {
                    tracing::warn!(session_id, "policy service unavailable: {e:#}");
                }
                Err(_) => {
                    tracing::warn!(
                        session_id,
                        timeout = ?remote.timeout,
                        "policy service timed out"
                    );
                }
            }
        }

        ValidationResult::accept(ValidationSource::Fallback, session_id, proposal.clone())
    }
}
