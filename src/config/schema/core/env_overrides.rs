use super::Config;
use crate::config::ProposerBackend;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ORBITWARDEN_PROPOSER_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            && !key.is_empty()
        {
            self.proposer.api_key = Some(key);
        }

        if let Ok(backend) = std::env::var("ORBITWARDEN_PROPOSER")
            && let Some(backend) = ProposerBackend::parse(&backend)
        {
            self.proposer.backend = backend;
        }

        if let Ok(model) = std::env::var("ORBITWARDEN_MODEL")
            && !model.is_empty()
        {
            self.proposer.model = model;
        }

        if let Ok(key) =
            std::env::var("ORBITWARDEN_POLICY_API_KEY").or_else(|_| std::env::var("POLICY_API_KEY"))
            && !key.is_empty()
        {
            self.policy.api_key = Some(key);
        }

        if let Ok(deployment) = std::env::var("ORBITWARDEN_POLICY_DEPLOYMENT_ID")
            .or_else(|_| std::env::var("POLICY_DEPLOYMENT_ID"))
            && !deployment.is_empty()
        {
            self.policy.deployment_id = Some(deployment);
        }

        if let Ok(url) = std::env::var("ORBITWARDEN_POLICY_URL")
            && !url.is_empty()
        {
            self.policy.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(dir) = std::env::var("ORBITWARDEN_DATA_DIR")
            && !dir.is_empty()
        {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(retries) = std::env::var("ORBITWARDEN_MAX_RETRIES")
            && let Ok(retries) = retries.parse::<u32>()
        {
            self.decision.max_retries = retries;
        }

        if let Ok(port_str) =
            std::env::var("ORBITWARDEN_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) =
            std::env::var("ORBITWARDEN_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }
    }
}
