use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Probability above which a conjunction is critical.
pub const CRITICAL_PROBABILITY: f64 = 0.7;
/// Probability above which a conjunction warrants a warning.
pub const WARNING_PROBABILITY: f64 = 0.4;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RiskStatus {
    Safe,
    Warning,
    Critical,
}

impl RiskStatus {
    pub fn from_probability(probability: f64) -> Self {
        if probability > CRITICAL_PROBABILITY {
            Self::Critical
        } else if probability > WARNING_PROBABILITY {
            Self::Warning
        } else {
            Self::Safe
        }
    }
}

/// Conjunction-risk report that opens a decision round.
///
/// Reports arrive from the risk source or from API callers, so every field
/// except the collision probability is optional on the wire. The probability
/// is clamped into `[0, 1]` and a missing status is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRiskReport")]
pub struct RiskReport {
    pub timestamp: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_km: Option<f64>,
    pub distance_to_debris_km: Option<f64>,
    pub collision_probability: f64,
    pub status: RiskStatus,
    pub scenario_mode: Option<String>,
    pub data_source: Option<String>,
}

#[derive(Deserialize)]
struct RawRiskReport {
    #[serde(default = "Utc::now")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    altitude_km: Option<f64>,
    #[serde(default)]
    distance_to_debris_km: Option<f64>,
    collision_probability: f64,
    #[serde(default)]
    status: Option<RiskStatus>,
    #[serde(default)]
    scenario_mode: Option<String>,
    #[serde(default)]
    data_source: Option<String>,
}

impl From<RawRiskReport> for RiskReport {
    fn from(raw: RawRiskReport) -> Self {
        let collision_probability = clamp_probability(raw.collision_probability);
        Self {
            timestamp: raw.timestamp,
            latitude: raw.latitude,
            longitude: raw.longitude,
            altitude_km: raw.altitude_km,
            distance_to_debris_km: raw.distance_to_debris_km,
            collision_probability,
            status: raw
                .status
                .unwrap_or_else(|| RiskStatus::from_probability(collision_probability)),
            scenario_mode: raw.scenario_mode,
            data_source: raw.data_source,
        }
    }
}

fn clamp_probability(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl RiskReport {
    /// Report with only a probability; status is derived.
    pub fn from_probability(collision_probability: f64) -> Self {
        let collision_probability = clamp_probability(collision_probability);
        Self {
            timestamp: Utc::now(),
            latitude: None,
            longitude: None,
            altitude_km: None,
            distance_to_debris_km: None,
            collision_probability,
            status: RiskStatus::from_probability(collision_probability),
            scenario_mode: None,
            data_source: None,
        }
    }

    pub fn with_status(mut self, status: RiskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_position(mut self, latitude: f64, longitude: f64, altitude_km: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.altitude_km = Some(altitude_km);
        self
    }

    pub fn with_scenario(mut self, scenario_mode: impl Into<String>) -> Self {
        self.scenario_mode = Some(scenario_mode.into());
        self
    }
}
