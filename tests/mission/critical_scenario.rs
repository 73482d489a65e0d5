use crate::harness::{FixedProposer, mission_in, prograde_burn, self_destruct};
use orbitwarden::agent::LoopOutcome;
use orbitwarden::learning::insights::{REC_DENY_LIST, REC_POLICY_AVAILABILITY};
use orbitwarden::security::{ValidationSource, Validator};
use orbitwarden::telemetry::{RiskReport, RiskStatus, ScanRequest};
use tempfile::TempDir;

#[tokio::test]
async fn hostile_commander_ends_in_manual_override() {
    let tmp = TempDir::new().unwrap();
    let proposer = FixedProposer::new(self_destruct());
    let mission = mission_in(tmp.path(), proposer.clone(), Validator::local_only(), 3).await;

    let risk = RiskReport::from_probability(0.95);
    assert_eq!(risk.status, RiskStatus::Critical);
    let report = mission.act(&risk, Some("hostile")).await.unwrap();

    let LoopOutcome::ManualOverrideRequired {
        reason,
        last_blocked_proposal,
        attempts,
        attempts_log,
        ..
    } = &report.outcome
    else {
        panic!("expected manual override, got {:?}", report.outcome.status());
    };
    assert_eq!(*attempts, 3);
    assert_eq!(attempts_log.len(), 3);
    assert_eq!(*last_blocked_proposal, self_destruct());
    assert!(reason.contains("after 3 attempts"));
    for record in attempts_log {
        assert!(!record.validation.valid);
        assert_eq!(record.validation.source, ValidationSource::LocalDenyList);
        assert_eq!(
            record.validation.violation_tags,
            vec!["DESTRUCT".to_string(), "SELF_DESTRUCT".to_string()]
        );
    }
    assert_eq!(proposer.call_count(), 3);

    assert!(!report.state_saved);
    let view = mission.state().await;
    assert_eq!(view.maneuver_count, 0);
    assert!(!view.has_original_trajectory);
}

#[tokio::test]
async fn hostile_sessions_show_up_in_insights() {
    let tmp = TempDir::new().unwrap();
    let mission = mission_in(
        tmp.path(),
        FixedProposer::new(self_destruct()),
        Validator::local_only(),
        2,
    )
    .await;

    mission
        .act(&RiskReport::from_probability(0.95), None)
        .await
        .unwrap();
    let insights = mission.insights().await.unwrap();

    assert_eq!(insights.summary.act_events, 1);
    assert_eq!(insights.summary.blocked_attempts, 2);
    assert!(insights.summary.execution_success_rate.abs() < 1e-9);
    assert_eq!(insights.summary.endpoint_errors.get("act"), Some(&1));
    assert_eq!(
        insights.failure_hotspots.violation_tags.get("SELF_DESTRUCT"),
        Some(&2)
    );
    assert_eq!(insights.recommendations[0], REC_DENY_LIST);
}

#[tokio::test]
async fn forced_scan_then_safe_burn_executes() {
    let tmp = TempDir::new().unwrap();
    let mission = mission_in(
        tmp.path(),
        FixedProposer::new(prograde_burn()),
        Validator::local_only(),
        3,
    )
    .await;

    let scan = mission
        .scan(&ScanRequest::new("ISS").critical(true))
        .await
        .unwrap();
    assert_eq!(scan.risk_data.status, RiskStatus::Critical);
    assert!(scan.risk_data.collision_probability > 0.7);

    let report = mission.act(&scan.risk_data, None).await.unwrap();
    assert!(report.outcome.is_executed());
    assert_eq!(report.outcome.attempts_log().len(), 1);
    assert_eq!(
        report.outcome.attempts_log()[0].validation.source,
        ValidationSource::Fallback
    );
    assert!(report.state_saved);

    let view = mission.state().await;
    assert_eq!(view.maneuver_count, 1);
    assert_eq!(view.state.position.lat, scan.risk_data.latitude.unwrap());

    let insights = mission.insights().await.unwrap();
    assert_eq!(insights.summary.scan_events, 1);
    assert_eq!(
        insights
            .summary
            .scenario_distribution
            .get("SYNTHETIC_DEBRIS_INJECTION"),
        Some(&1)
    );
    assert!(
        insights
            .recommendations
            .contains(&REC_POLICY_AVAILABILITY.to_string())
    );
}
