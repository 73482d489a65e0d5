use serde::{Deserialize, Serialize};

/// Remote policy service settings. The remote tier only runs when both the
/// API key and the deployment id are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as the service's API version header.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Tokens appended to the built-in deny-list. The built-in set always applies.
    #[serde(default)]
    pub extra_blocked_keywords: Vec<String>,
    /// Reported to the policy service as the assistant model name.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    /// Reported to the policy service as the environment name.
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_base_url() -> String {
    "https://us.whitecircle.ai".into()
}

fn default_api_version() -> String {
    "2025-12-01".into()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_assistant_name() -> String {
    "orbitwarden-commander".into()
}

fn default_environment() -> String {
    "orbitwarden".into()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            deployment_id: None,
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            extra_blocked_keywords: Vec::new(),
            assistant_name: default_assistant_name(),
            environment: default_environment(),
        }
    }
}

impl PolicyConfig {
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.api_key) && present(&self.deployment_id) && !self.base_url.is_empty()
    }
}
