use super::super::{
    DecisionConfig, GatewayConfig, PolicyConfig, ProposerConfig, StorageConfig, TelemetryConfig,
};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub proposer: ProposerConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub decision: DecisionConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let warden_dir = home.join(".orbitwarden");

        Self {
            workspace_dir: warden_dir.join("workspace"),
            config_path: warden_dir.join("config.toml"),
            proposer: ProposerConfig::default(),
            policy: PolicyConfig::default(),
            decision: DecisionConfig::default(),
            telemetry: TelemetryConfig::default(),
            gateway: GatewayConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Directory holding the state file and the event log.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| self.workspace_dir.join("data"))
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.state_filename)
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.events_filename)
    }

    /// Reject values the runtime cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.proposer.temperature) {
            return Err(ConfigError::Validation(format!(
                "proposer.temperature must be within 0.0..=2.0 (got {})",
                self.proposer.temperature
            )));
        }
        if self.proposer.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "proposer.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.policy.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "policy.timeout_secs must be greater than zero".into(),
            ));
        }
        if !(1..=crate::agent::MAX_RETRIES_HARD_CAP).contains(&self.decision.max_retries) {
            return Err(ConfigError::Validation(format!(
                "decision.max_retries must be within 1..={} (got {})",
                crate::agent::MAX_RETRIES_HARD_CAP,
                self.decision.max_retries
            )));
        }
        if self.storage.insights_window == 0 {
            return Err(ConfigError::Validation(
                "storage.insights_window must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn data_paths_follow_workspace() {
        let config = Config {
            workspace_dir: PathBuf::from("/tmp/ow"),
            ..Config::default()
        };
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/ow/data"));
        assert_eq!(
            config.state_path(),
            PathBuf::from("/tmp/ow/data/spacecraft_state.json")
        );
        assert_eq!(
            config.events_path(),
            PathBuf::from("/tmp/ow/data/agent_events.jsonl")
        );
    }

    #[test]
    fn explicit_data_dir_wins() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/warden"));
        assert_eq!(
            config.state_path(),
            PathBuf::from("/srv/warden/spacecraft_state.json")
        );
    }

    #[test]
    fn out_of_range_temperature_rejected() {
        let mut config = Config::default();
        config.proposer.temperature = 3.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn zero_retries_rejected() {
        let mut config = Config::default();
        config.decision.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_toml_uses_section_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.decision.max_retries, 3);
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.policy.timeout_secs, 20);
    }
}
