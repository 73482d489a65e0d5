use crate::harness::{FixedProposer, mission_in, prograde_burn};
use orbitwarden::security::Validator;
use orbitwarden::state::{ManeuverReason, SpacecraftState, StateStore};
use orbitwarden::telemetry::RiskReport;
use tempfile::TempDir;

#[tokio::test]
async fn state_survives_restart() {
    let tmp = TempDir::new().unwrap();
    let risk = RiskReport::from_probability(0.95).with_position(12.0, -45.0, 418.0);

    let before = {
        let mission = mission_in(
            tmp.path(),
            FixedProposer::new(prograde_burn()),
            Validator::local_only(),
            3,
        )
        .await;
        mission.act(&risk, None).await.unwrap();
        mission.state().await.state
    };

    let reopened = StateStore::open(tmp.path().join("spacecraft_state.json")).await;
    assert_eq!(reopened.snapshot().await, before);
    assert_eq!(before.position.alt_km, 418.0);
}

#[tokio::test]
async fn baseline_is_captured_once_and_restored() {
    let tmp = TempDir::new().unwrap();
    let mission = mission_in(
        tmp.path(),
        FixedProposer::new(prograde_burn()),
        Validator::local_only(),
        3,
    )
    .await;
    let initial = mission.state().await.state;

    mission
        .act(&RiskReport::from_probability(0.9).with_position(1.0, 1.0, 410.0), None)
        .await
        .unwrap();
    let first = mission.state().await.state.original_trajectory.unwrap();
    mission
        .act(&RiskReport::from_probability(0.9).with_position(2.0, 2.0, 420.0), None)
        .await
        .unwrap();
    let view = mission.state().await;

    assert_eq!(view.maneuver_count, 2);
    assert_eq!(view.state.original_trajectory.unwrap(), first);
    assert_eq!(first.position, initial.position);

    let restored = mission.restore().await.unwrap();
    assert!(restored.restored);
    assert_eq!(restored.state.position, initial.position);
    assert!(restored.state.original_trajectory.is_none());
    let last = restored.state.last_maneuver.unwrap();
    assert_eq!(last.reason, ManeuverReason::TrajectoryRestoration);

    let again = mission.restore().await.unwrap();
    assert!(!again.restored);

    let history = mission.history().await;
    assert_eq!(history.total_maneuvers, 3);
}

#[tokio::test]
async fn corrupt_state_file_loads_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("spacecraft_state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = StateStore::open(&path).await;
    let state = store.snapshot().await;

    assert_eq!(state.position, SpacecraftState::default().position);
    assert_eq!(state.maneuver_count(), 0);
}
