use super::types::{
    ManeuverReason, ManeuverRecord, Position, SpacecraftState, TrajectorySnapshot,
};
use crate::agent::{ActionProposal, ManeuverAction};
use crate::telemetry::RiskReport;
use chrono::{DateTime, Utc};

/// Apply an executed proposal to `state` at the given instant.
///
/// The first deviation captures the pre-maneuver baseline; it is never
/// overwritten until a restore clears it. Position fields missing from the
/// report keep their prior values.
pub fn apply_maneuver_at(
    state: &SpacecraftState,
    risk: &RiskReport,
    proposal: &ActionProposal,
    at: DateTime<Utc>,
) -> SpacecraftState {
    let mut next = state.clone();

    if next.original_trajectory.is_none() {
        next.original_trajectory = Some(TrajectorySnapshot {
            position: state.position,
            velocity: state.velocity,
            timestamp: at,
        });
    }

    next.position = Position {
        lat: risk.latitude.unwrap_or(state.position.lat),
        lon: risk.longitude.unwrap_or(state.position.lon),
        alt_km: risk.altitude_km.unwrap_or(state.position.alt_km),
    };

    let record = ManeuverRecord {
        timestamp: at,
        reason: ManeuverReason::CollisionAvoidance,
        action: proposal.action.clone(),
        thrust_direction: Some(proposal.thrust_direction),
        confidence: Some(proposal.confidence),
    };
    next.maneuver_history.push(record.clone());
    next.last_maneuver = Some(record);
    next.updated_at = Some(at);
    next
}

pub fn apply_maneuver(
    state: &SpacecraftState,
    risk: &RiskReport,
    proposal: &ActionProposal,
) -> SpacecraftState {
    apply_maneuver_at(state, risk, proposal, Utc::now())
}

/// Copy the baseline back and clear it. Returns `(state, restored)`; with no
/// baseline the state comes back untouched and `restored` is false.
pub fn restore_original_trajectory_at(
    state: &SpacecraftState,
    at: DateTime<Utc>,
) -> (SpacecraftState, bool) {
    let Some(baseline) = &state.original_trajectory else {
        return (state.clone(), false);
    };

    let mut next = state.clone();
    next.position = baseline.position;
    next.velocity = baseline.velocity;
    next.original_trajectory = None;

    let record = ManeuverRecord {
        timestamp: at,
        reason: ManeuverReason::TrajectoryRestoration,
        action: ManeuverAction::HoldPosition,
        thrust_direction: None,
        confidence: None,
    };
    next.maneuver_history.push(record.clone());
    next.last_maneuver = Some(record);
    next.updated_at = Some(at);
    (next, true)
}

pub fn restore_original_trajectory(state: &SpacecraftState) -> (SpacecraftState, bool) {
    restore_original_trajectory_at(state, Utc::now())
}
