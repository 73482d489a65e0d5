use serde::{Deserialize, Serialize};

/// Which backend produces candidate maneuvers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProposerBackend {
    #[default]
    Gemini,
    OpenaiCompatible,
    /// Deterministic threshold rules, no network access.
    Rules,
}

impl ProposerBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai-compatible" | "openai_compatible" | "openai" | "compatible" => {
                Some(Self::OpenaiCompatible)
            }
            "rules" | "rule-based" | "offline" => Some(Self::Rules),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposerConfig {
    #[serde(default)]
    pub backend: ProposerBackend,
    /// API key for the LLM backend. Without one the rules backend is used.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL, only read by the OpenAI-compatible backend.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Upper bound on one proposal round-trip.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-1.5-flash".into()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProposerConfig {
    fn default() -> Self {
        Self {
            backend: ProposerBackend::default(),
            api_key: None,
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parse_aliases() {
        assert_eq!(ProposerBackend::parse("Gemini"), Some(ProposerBackend::Gemini));
        assert_eq!(
            ProposerBackend::parse("openai"),
            Some(ProposerBackend::OpenaiCompatible)
        );
        assert_eq!(ProposerBackend::parse(" rules "), Some(ProposerBackend::Rules));
        assert_eq!(ProposerBackend::parse("carrier-pigeon"), None);
    }

    #[test]
    fn backend_serde_is_kebab_case() {
        let json = serde_json::to_string(&ProposerBackend::OpenaiCompatible).unwrap();
        assert_eq!(json, "\"openai-compatible\"");
        assert_eq!(ProposerBackend::Rules.to_string(), "rules");
    }
}
