use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides `<workspace>/data`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_state_filename")]
    pub state_filename: String,
    #[serde(default = "default_events_filename")]
    pub events_filename: String,
    /// Trailing events read when computing insights.
    #[serde(default = "default_insights_window")]
    pub insights_window: usize,
}

fn default_state_filename() -> String {
    "spacecraft_state.json".into()
}

fn default_events_filename() -> String {
    "agent_events.jsonl".into()
}

fn default_insights_window() -> usize {
    800
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            state_filename: default_state_filename(),
            events_filename: default_events_filename(),
            insights_window: default_insights_window(),
        }
    }
}
