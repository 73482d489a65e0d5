use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Proposal attempts per session before manual override.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    3
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}
