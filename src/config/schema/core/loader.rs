use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(".orbitwarden"))
    }

    /// Load `config.toml` from `warden_dir`, writing defaults on first run.
    pub fn load_or_init_in(warden_dir: &Path) -> Result<Self> {
        let config_path = warden_dir.join("config.toml");

        if !warden_dir.exists() {
            fs::create_dir_all(warden_dir).context("Failed to create .orbitwarden directory")?;
            fs::create_dir_all(warden_dir.join("workspace"))
                .context("Failed to create workspace directory")?;
        }

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            config.workspace_dir = warden_dir.join("workspace");
            config
        } else {
            let config = Self {
                config_path: config_path.clone(),
                workspace_dir: warden_dir.join("workspace"),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::{ENV_LOCK, EnvVarGuard};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_run_writes_default_config() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _port = EnvVarGuard::unset("PORT");
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".orbitwarden");

        let config = Config::load_or_init_in(&dir).unwrap();

        assert!(dir.join("config.toml").exists());
        assert!(dir.join("workspace").exists());
        assert_eq!(config.workspace_dir, dir.join("workspace"));
        assert_eq!(config.decision.max_retries, 3);
    }

    #[test]
    fn existing_config_is_parsed() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _retries = EnvVarGuard::unset("ORBITWARDEN_MAX_RETRIES");
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".orbitwarden");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.toml"),
            "[decision]\nmax_retries = 5\n\n[policy]\ntimeout_secs = 7\n",
        )
        .unwrap();

        let config = Config::load_or_init_in(&dir).unwrap();

        assert_eq!(config.decision.max_retries, 5);
        assert_eq!(config.policy.timeout_secs, 7);
        assert_eq!(config.config_path, dir.join("config.toml"));
    }

    #[test]
    fn invalid_config_fails_validation() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _retries = EnvVarGuard::unset("ORBITWARDEN_MAX_RETRIES");
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".orbitwarden");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[decision]\nmax_retries = 0\n").unwrap();

        let err = Config::load_or_init_in(&dir).unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }
}
