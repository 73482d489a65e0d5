use super::tle::{ElementSet, FALLBACK_TLE, find_in_catalogue, round_to};
use super::types::{RiskReport, RiskStatus};
use super::{RiskSource, ScanRequest};
use crate::config::TelemetryConfig;
use crate::error::RiskError;
use crate::llm::{build_provider_client_with_timeout, sanitize_api_error};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use sha2::{Digest, Sha256};

pub const SCENARIO_LIVE: &str = "LIVE_OBSERVATION";
pub const SCENARIO_SYNTHETIC: &str = "SYNTHETIC_DEBRIS_INJECTION";

const FORCED_PROBABILITY: f64 = 0.95;
const FORCED_DISTANCE_KM: f64 = 0.5;

/// Risk source that places the spacecraft on a real ground track and rolls a
/// synthetic debris encounter against it.
///
/// Element sets come from the caller, then the live catalogue, then a
/// built-in set. The encounter is seeded by the element lines and the
/// current UTC minute, so repeated scans within a minute agree.
pub struct SimulatedRiskSource {
    config: TelemetryConfig,
    client: Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TleOrigin {
    UserProvided,
    Live,
    Fallback,
}

impl TleOrigin {
    fn label(self) -> &'static str {
        match self {
            Self::UserProvided => "User-Provided",
            Self::Live => "CelesTrak (Live)",
            Self::Fallback => "Hardcoded Fallback",
        }
    }
}

impl SimulatedRiskSource {
    pub fn new(config: TelemetryConfig) -> Self {
        let client = build_provider_client_with_timeout(config.timeout_secs);
        Self { config, client }
    }

    async fn fetch_live_tle(&self) -> anyhow::Result<(String, String)> {
        let response = self
            .client
            .get(&self.config.tle_url)
            .send()
            .await
            .context("TLE catalogue request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("TLE catalogue error ({status}): {}", sanitize_api_error(&body));
        }

        let body = response
            .text()
            .await
            .context("failed to read TLE catalogue body")?;
        find_in_catalogue(&body, &self.config.satellite_name).with_context(|| {
            format!(
                "satellite '{}' not found in catalogue",
                self.config.satellite_name
            )
        })
    }

    async fn resolve_tle(&self, request: &ScanRequest) -> (String, String, TleOrigin) {
        if let Some((line1, line2)) = &request.tle
            && !line1.trim().is_empty()
            && !line2.trim().is_empty()
        {
            return (line1.clone(), line2.clone(), TleOrigin::UserProvided);
        }

        if self.config.live_fetch {
            match self.fetch_live_tle().await {
                Ok((line1, line2)) => {
                    tracing::info!(
                        satellite = %self.config.satellite_name,
                        epoch = line1.get(18..32).unwrap_or_default(),
                        "live TLE fetched"
                    );
                    return (line1, line2, TleOrigin::Live);
                }
                Err(e) => {
                    tracing::warn!("live TLE fetch failed ({e:#}), using built-in element set");
                }
            }
        }

        (
            FALLBACK_TLE.0.to_string(),
            FALLBACK_TLE.1.to_string(),
            TleOrigin::Fallback,
        )
    }

    /// Assess at an explicit instant.
    pub async fn assess_at(
        &self,
        request: &ScanRequest,
        now: DateTime<Utc>,
    ) -> Result<RiskReport, RiskError> {
        let (line1, line2, origin) = self.resolve_tle(request).await;
        let elements = ElementSet::parse(&line1, &line2)?;
        let point = elements.ground_point_at(now);
        if !point.latitude.is_finite() || !point.longitude.is_finite() {
            return Err(RiskError::Propagation(format!(
                "non-finite ground point for {}",
                request.satellite_id
            )));
        }

        let (probability, distance_km, status, scenario) = if request.force_critical {
            tracing::info!(satellite = %request.satellite_id, "injecting synthetic debris threat");
            (
                FORCED_PROBABILITY,
                FORCED_DISTANCE_KM,
                RiskStatus::Critical,
                SCENARIO_SYNTHETIC,
            )
        } else {
            let seed = encounter_seed(&line1, &line2, now.minute());
            let (probability, distance_km) = simulate_encounter(seed);
            (
                probability,
                distance_km,
                RiskStatus::from_probability(probability),
                SCENARIO_LIVE,
            )
        };

        Ok(RiskReport {
            timestamp: now,
            latitude: Some(point.latitude),
            longitude: Some(point.longitude),
            altitude_km: Some(point.altitude_km),
            distance_to_debris_km: Some(distance_km),
            collision_probability: probability,
            status,
            scenario_mode: Some(scenario.to_string()),
            data_source: Some(format!(
                "{} (Live Fetch: {})",
                origin.label(),
                now.format("%Y-%m-%d %H:%M:%S UTC")
            )),
        })
    }
}

#[async_trait]
impl RiskSource for SimulatedRiskSource {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn assess(&self, request: &ScanRequest) -> Result<RiskReport, RiskError> {
        self.assess_at(request, Utc::now()).await
    }
}

/// Seed from the element lines and the minute of the hour.
pub fn encounter_seed(line1: &str, line2: &str, minute: u32) -> u64 {
    let payload = format!("{}|{}|{minute}", line1.trim(), line2.trim());
    let digest = Sha256::digest(payload.as_bytes());
    u64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

/// Roll a debris distance in 1..50 km and an inverse-square-ish probability
/// with a small gaussian nudge. Returns `(probability, distance_km)`.
pub fn simulate_encounter(seed: u64) -> (f64, f64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let distance_km: f64 = rng.random_range(1.0..50.0);
    let raw = 1.0 / (1.0 + (distance_km / 5.0).powi(2));
    let nudge = gaussian(&mut rng, 0.05);
    let probability = round_to((raw + nudge).clamp(0.0, 1.0), 4);
    (probability, round_to(distance_km, 3))
}

// Box-Muller; `1 - u` keeps the log argument in (0, 1].
fn gaussian(rng: &mut StdRng, sigma: f64) -> f64 {
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
