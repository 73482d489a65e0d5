//! Fold over the event-log tail into summary statistics and recommendations.

use super::event_log::{Event, EventType};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Upper bound on events echoed back in `recent_events`.
pub const MAX_RECENT_EVENTS: usize = 80;

const ACT_LATENCY_BUDGET_MS: f64 = 3500.0;
const SCAN_LATENCY_BUDGET_MS: f64 = 1800.0;

pub const REC_NO_DATA: &str = "No runtime data yet. Run scans and maneuvers to build insights.";
pub const REC_DENY_LIST: &str = "Commander prompts should explicitly avoid deny-listed commands when proposing emergency maneuvers.";
pub const REC_POLICY_AVAILABILITY: &str = "Security validation frequently uses fallback mode. Investigate policy service availability to strengthen policy enforcement.";
pub const REC_ACT_LATENCY: &str = "Agent loop latency is elevated. Cache model/system prompt context and reduce response token budget for faster decisions.";
pub const REC_SCAN_LATENCY: &str = "Scan latency is elevated. Consider caching TLE responses for short intervals during demo bursts.";
pub const REC_STABLE: &str = "System health is stable. Continue collecting traces and expand edge-case simulations to harden autonomous behavior.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_events: usize,
    pub scan_events: usize,
    pub act_events: usize,
    pub blocked_attempts: usize,
    /// Executed / act events, in `[0, 1]`.
    pub execution_success_rate: f64,
    pub endpoint_errors: BTreeMap<String, usize>,
    pub scenario_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub scan_avg: f64,
    pub act_avg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FailureHotspots {
    pub violation_tags: BTreeMap<String, usize>,
    pub security_sources: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    pub summary: Summary,
    pub latency_ms: LatencySummary,
    pub failure_hotspots: FailureHotspots,
    pub recommendations: Vec<String>,
    pub recent_events: Vec<Event>,
}

fn latency_of(payload: &Value) -> f64 {
    payload
        .get("latency_ms")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

fn status_of(payload: &Value) -> &str {
    payload.get("status").and_then(Value::as_str).unwrap_or("")
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    round_to(mean, 2)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn bump(counter: &mut BTreeMap<String, usize>, key: impl Into<String>) {
    *counter.entry(key.into()).or_insert(0) += 1;
}

pub fn summarize(events: &[Event]) -> Insights {
    if events.is_empty() {
        return Insights {
            recommendations: vec![REC_NO_DATA.to_string()],
            ..Insights::default()
        };
    }

    let mut summary = Summary {
        total_events: events.len(),
        ..Summary::default()
    };
    let mut hotspots = FailureHotspots::default();
    let mut scan_latencies = Vec::new();
    let mut act_latencies = Vec::new();
    let mut executed = 0_usize;

    for event in events {
        let payload = &event.payload;
        match event.event_type {
            EventType::Scan => {
                summary.scan_events += 1;
                scan_latencies.push(latency_of(payload));
                let scenario = payload
                    .get("scenario_mode")
                    .and_then(Value::as_str)
                    .unwrap_or("UNKNOWN");
                bump(&mut summary.scenario_distribution, scenario);
                if status_of(payload) == "ERROR" {
                    bump(&mut summary.endpoint_errors, "scan");
                }
            }
            EventType::Act => {
                summary.act_events += 1;
                act_latencies.push(latency_of(payload));
                let status = status_of(payload);
                if status == "EXECUTED" {
                    executed += 1;
                }
                if status.starts_with("MANUAL_") {
                    bump(&mut summary.endpoint_errors, "act");
                }

                let attempts = payload
                    .get("attempts_log")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                for attempt in attempts {
                    let Some(validation) = attempt.get("validation") else {
                        continue;
                    };
                    let source = validation
                        .get("source")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown");
                    bump(&mut hotspots.security_sources, source);

                    if validation.get("valid").and_then(Value::as_bool) == Some(false) {
                        summary.blocked_attempts += 1;
                        let tags: Vec<&str> = validation
                            .get("violation_tags")
                            .and_then(Value::as_array)
                            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
                            .unwrap_or_default();
                        if tags.is_empty() {
                            bump(&mut hotspots.violation_tags, "UNKNOWN");
                        } else {
                            for tag in tags {
                                bump(&mut hotspots.violation_tags, tag);
                            }
                        }
                    }
                }
            }
            EventType::Unknown => {}
        }
    }

    if summary.act_events > 0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = executed as f64 / summary.act_events as f64;
        summary.execution_success_rate = round_to(rate, 4);
    }

    let latency_ms = LatencySummary {
        scan_avg: average(&scan_latencies),
        act_avg: average(&act_latencies),
    };
    let recommendations = recommend(&summary, &hotspots, &latency_ms);
    let recent_start = events.len().saturating_sub(MAX_RECENT_EVENTS);

    Insights {
        summary,
        latency_ms,
        failure_hotspots: hotspots,
        recommendations,
        recent_events: events[recent_start..].to_vec(),
    }
}

fn recommend(
    summary: &Summary,
    hotspots: &FailureHotspots,
    latency: &LatencySummary,
) -> Vec<String> {
    let source_count = |source: &str| {
        hotspots
            .security_sources
            .get(source)
            .copied()
            .unwrap_or(0)
    };

    let mut recs = Vec::new();
    if summary.blocked_attempts > 0 {
        recs.push(REC_DENY_LIST);
    }
    if source_count("fallback") > source_count("remote_policy") {
        recs.push(REC_POLICY_AVAILABILITY);
    }
    if latency.act_avg > ACT_LATENCY_BUDGET_MS {
        recs.push(REC_ACT_LATENCY);
    }
    if latency.scan_avg > SCAN_LATENCY_BUDGET_MS {
        recs.push(REC_SCAN_LATENCY);
    }
    if recs.is_empty() {
        recs.push(REC_STABLE);
    }
    recs.into_iter().map(str::to_string).collect()
}
