use crate::agent::{ManeuverAction, ThrustDirection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub alt_km: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            alt_km: 400.0,
        }
    }
}

/// Velocity in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Velocity {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 7800.0,
            z: 0.0,
        }
    }
}

/// Pre-maneuver baseline captured on the first deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySnapshot {
    pub position: Position,
    pub velocity: Velocity,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ManeuverReason {
    CollisionAvoidance,
    TrajectoryRestoration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManeuverRecord {
    pub timestamp: DateTime<Utc>,
    pub reason: ManeuverReason,
    pub action: ManeuverAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thrust_direction: Option<ThrustDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Durable spacecraft record. Missing fields in a stored file fall back to
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpacecraftState {
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub velocity: Velocity,
    #[serde(default)]
    pub original_trajectory: Option<TrajectorySnapshot>,
    #[serde(default)]
    pub last_maneuver: Option<ManeuverRecord>,
    #[serde(default)]
    pub maneuver_history: Vec<ManeuverRecord>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SpacecraftState {
    pub fn has_original_trajectory(&self) -> bool {
        self.original_trajectory.is_some()
    }

    pub fn maneuver_count(&self) -> usize {
        self.maneuver_history.len()
    }
}
