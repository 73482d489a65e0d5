use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Fetch the latest element set before falling back to the built-in one.
    #[serde(default = "default_true")]
    pub live_fetch: bool,
    #[serde(default = "default_tle_url")]
    pub tle_url: String,
    /// Name line of the tracked object inside the TLE catalogue.
    #[serde(default = "default_satellite_name")]
    pub satellite_name: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_tle_url() -> String {
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle".into()
}

fn default_satellite_name() -> String {
    "ISS (ZARYA)".into()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            live_fetch: true,
            tle_url: default_tle_url(),
            satellite_name: default_satellite_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
