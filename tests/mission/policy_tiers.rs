use crate::harness::{FixedProposer, mission_in, policy_config, prograde_burn};
use orbitwarden::agent::LoopOutcome;
use orbitwarden::security::{ValidationSource, Validator};
use orbitwarden::telemetry::RiskReport;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn policy_flag_rejects_every_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/check"))
        .and(header("authorization", "Bearer policy-test-key"))
        .and(header("whitecircle-version", "2025-12-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flagged": true,
            "policies": {
                "p-2": {"flagged": true, "name": "Kinetic harm", "flagged_source": ["assistant"]},
                "p-1": {"flagged": false, "name": "Benign"}
            },
            "internal_session_id": "ws-1"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let validator = Validator::from_config(&policy_config(&server.uri(), 5));
    assert!(validator.has_remote_tier());
    let mission = mission_in(tmp.path(), FixedProposer::new(prograde_burn()), validator, 2).await;

    let report = mission
        .act(&RiskReport::from_probability(0.95), Some("flagged"))
        .await
        .unwrap();

    assert_eq!(report.outcome.status(), "MANUAL_OVERRIDE_REQUIRED");
    for record in report.outcome.attempts_log() {
        assert_eq!(record.validation.source, ValidationSource::RemotePolicy);
        assert_eq!(
            record.validation.violation_tags,
            vec!["Kinetic harm:assistant".to_string()]
        );
        assert_eq!(record.validation.policy_session_id.as_deref(), Some("ws-1"));
    }
}

#[tokio::test]
async fn policy_clear_executes_with_remote_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "flagged": false,
            "policies": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let validator = Validator::from_config(&policy_config(&server.uri(), 5));
    let mission = mission_in(tmp.path(), FixedProposer::new(prograde_burn()), validator, 3).await;

    let report = mission
        .act(&RiskReport::from_probability(0.95), None)
        .await
        .unwrap();

    let LoopOutcome::Executed { attempts_log, .. } = &report.outcome else {
        panic!("expected EXECUTED");
    };
    assert_eq!(attempts_log[0].validation.source, ValidationSource::RemotePolicy);
    assert!(attempts_log[0].validation.violation_tags.is_empty());
}

#[tokio::test]
async fn slow_policy_service_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"flagged": true, "policies": {}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let validator = Validator::from_config(&policy_config(&server.uri(), 1));
    let mission = mission_in(tmp.path(), FixedProposer::new(prograde_burn()), validator, 3).await;

    let report = mission
        .act(&RiskReport::from_probability(0.95), None)
        .await
        .unwrap();

    assert!(report.outcome.is_executed());
    let record = &report.outcome.attempts_log()[0];
    assert!(record.validation.valid);
    assert_eq!(record.validation.source, ValidationSource::Fallback);
}

#[tokio::test]
async fn policy_outage_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/check"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let validator = Validator::from_config(&policy_config(&server.uri(), 5));
    let mission = mission_in(tmp.path(), FixedProposer::new(prograde_burn()), validator, 3).await;

    let report = mission
        .act(&RiskReport::from_probability(0.95), None)
        .await
        .unwrap();

    assert!(report.outcome.is_executed());
    assert_eq!(
        report.outcome.attempts_log()[0].validation.source,
        ValidationSource::Fallback
    );
}

#[tokio::test]
async fn deny_list_short_circuits_remote_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"flagged": false})))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let validator = Validator::from_config(&policy_config(&server.uri(), 5));
    let mission = mission_in(
        tmp.path(),
        FixedProposer::new(crate::harness::self_destruct()),
        validator,
        1,
    )
    .await;

    let report = mission
        .act(&RiskReport::from_probability(0.95), None)
        .await
        .unwrap();

    assert!(!report.outcome.is_executed());
    assert_eq!(
        report.outcome.attempts_log()[0].validation.source,
        ValidationSource::LocalDenyList
    );
}
