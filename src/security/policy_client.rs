//! Client for the remote content-policy service (`POST /api/session/check`).

use crate::config::PolicyConfig;
use crate::llm::{build_provider_client_with_timeout, sanitize_api_error};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const VERSION_HEADER: &str = "whitecircle-version";

#[derive(Debug, Clone, Serialize)]
pub struct PolicyCheckRequest {
    pub deployment_id: String,
    pub messages: Vec<PolicyMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_session_id: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub include_context: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyMessage {
    pub role: &'static str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyCheckResponse {
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyOutcome>,
    #[serde(default)]
    pub internal_session_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyOutcome {
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub flagged_source: Vec<String>,
}

impl PolicyCheckResponse {
    /// One tag per flagged policy, visited in id order.
    pub fn violation_tags(&self) -> Vec<String> {
        self.policies
            .iter()
            .filter(|(_, policy)| policy.flagged)
            .map(|(id, policy)| {
                let name = policy.name.as_deref().unwrap_or(id);
                if policy.flagged_source.is_empty() {
                    name.to_string()
                } else {
                    format!("{name}:{}", policy.flagged_source.join(","))
                }
            })
            .collect()
    }
}

/// Remote policy tier. Any `Err` means the tier is unavailable.
#[async_trait]
pub trait PolicyClient: Send + Sync {
    async fn check(&self, request: &PolicyCheckRequest) -> anyhow::Result<PolicyCheckResponse>;
}

pub struct HttpPolicyClient {
    endpoint: String,
    /// Pre-computed `"Bearer <key>"` header value.
    auth_header: String,
    api_version: String,
    client: Client,
}

impl HttpPolicyClient {
    /// `None` when the key or deployment id is missing.
    pub fn from_config(config: &PolicyConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        let api_key = config.api_key.as_deref()?.trim();
        Some(Self {
            endpoint: format!(
                "{}/api/session/check",
                config.base_url.trim_end_matches('/')
            ),
            auth_header: format!("Bearer {api_key}"),
            api_version: config.api_version.clone(),
            client: build_provider_client_with_timeout(config.timeout_secs),
        })
    }
}

#[async_trait]
impl PolicyClient for HttpPolicyClient {
    async fn check(&self, request: &PolicyCheckRequest) -> anyhow::Result<PolicyCheckResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.auth_header)
            .header(VERSION_HEADER, &self.api_version)
            .json(request)
            .send()
            .await
            .context("policy service request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("policy service error ({status}): {}", sanitize_api_error(&body));
        }

        response
            .json::<PolicyCheckResponse>()
            .await
            .context("policy service returned an unreadable body")
    }
}
