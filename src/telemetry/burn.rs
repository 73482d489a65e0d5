use super::tle::round_to;
use super::types::CRITICAL_PROBABILITY;
use serde::Serialize;

/// Fuel percentage below which no burn is attempted.
pub const MIN_FUEL_PCT: f64 = 10.0;
const THRUSTER_ACCEL_MS2: f64 = 0.1;
const FUEL_PCT_PER_MS: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BurnPlan {
    NoAction {
        reason: String,
    },
    Alert {
        reason: String,
    },
    #[serde(rename = "FIRE_THRUSTERS")]
    Burn {
        direction: String,
        delta_v_ms: f64,
        burn_duration_sec: f64,
        estimated_fuel_cost_pct: f64,
        post_burn_fuel_pct: f64,
        risk_probability_input: f64,
    },
}

/// Size a prograde avoidance burn for `probability` with `fuel_pct` remaining.
///
/// Delta-v ramps from 0.5 m/s at the critical threshold to 2.5 m/s at
/// certainty along a 1.5-power curve.
pub fn plan_avoidance_burn(probability: f64, fuel_pct: f64) -> BurnPlan {
    if probability < CRITICAL_PROBABILITY {
        return BurnPlan::NoAction {
            reason: format!(
                "Collision probability below threshold (< {CRITICAL_PROBABILITY}). No maneuver required."
            ),
        };
    }
    if fuel_pct < MIN_FUEL_PCT {
        return BurnPlan::Alert {
            reason: format!(
                "WARNING: Fuel level critically low ({fuel_pct:.1}%). Unable to execute avoidance burn. \
                 Recommend ground-station contingency protocol."
            ),
        };
    }

    let normalised = ((probability - CRITICAL_PROBABILITY) / (1.0 - CRITICAL_PROBABILITY)).min(1.0);
    let delta_v_ms = round_to(0.5 + 2.0 * normalised.powf(1.5), 4);
    let fuel_cost = round_to(delta_v_ms * FUEL_PCT_PER_MS, 2);

    BurnPlan::Burn {
        direction: "PROGRADE".to_string(),
        delta_v_ms,
        burn_duration_sec: round_to(delta_v_ms / THRUSTER_ACCEL_MS2, 2),
        estimated_fuel_cost_pct: fuel_cost,
        post_burn_fuel_pct: round_to(fuel_pct - fuel_cost, 2),
        risk_probability_input: probability,
    }
}
