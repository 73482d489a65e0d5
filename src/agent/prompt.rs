use super::types::{ActionProposal, ManeuverAction, ThrustDirection};
use crate::telemetry::RiskReport;
use crate::telemetry::types::CRITICAL_PROBABILITY;
use anyhow::Context;
use serde::Deserialize;
use std::fmt::Write;

const SYSTEM_PROMPT: &str = "\
You are OrbitWarden, an autonomous satellite collision-avoidance commander.
Your top priority is collision avoidance.

RULES:
1. If collision_probability > 0.7 you MUST recommend action \"FIRE_THRUSTERS\".
2. If collision_probability <= 0.7 you MUST recommend action \"HOLD_POSITION\".
3. Explain your reasoning clearly in exactly one sentence.

OUTPUT FORMAT:
Respond with strictly valid JSON. No Markdown fences, no comments,
no extra text before or after the JSON object.

JSON SCHEMA:
{
  \"action\": \"FIRE_THRUSTERS\" | \"HOLD_POSITION\",
  \"reasoning\": \"<one-sentence explanation>\",
  \"confidence_score\": <float between 0.0 and 1.0>,
  \"recommended_thrust_direction\": \"PROGRADE\" | \"RETROGRADE\" | \"NONE\"
}
";

/// Prompt pair for one proposal round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRequest {
    pub system_prompt: String,
    pub user_message: String,
}

pub fn build_decision_request(risk: &RiskReport, prior_rejection: Option<&str>) -> DecisionRequest {
    let altitude = risk
        .altitude_km
        .map_or_else(|| "N/A".to_string(), |alt| alt.to_string());

    let mut user_message = String::from("Satellite telemetry update:\n");
    let _ = writeln!(user_message, "  - Altitude:              {altitude} km");
    let _ = writeln!(
        user_message,
        "  - Collision Probability: {}",
        risk.collision_probability
    );
    let _ = writeln!(user_message, "  - Current Status:        {}", risk.status);
    if let Some(distance) = risk.distance_to_debris_km {
        let _ = writeln!(user_message, "  - Distance to Debris:    {distance} km");
    }

    if let Some(rejection) = prior_rejection.filter(|r| !r.trim().is_empty()) {
        let _ = write!(
            user_message,
            "\nYour previous command was rejected by the safety validator:\n{rejection}\n\
             Produce a SAFE alternative that avoids every blocked term.\n"
        );
    }

    user_message.push_str("\nAnalyze this data and provide your decision as JSON.");

    DecisionRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_message,
    }
}

/// All four keys are required; extra keys are ignored.
#[derive(Deserialize)]
struct RawDecision {
    action: String,
    reasoning: String,
    confidence_score: f64,
    recommended_thrust_direction: String,
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Parse a model reply into a proposal.
pub fn parse_decision(raw: &str) -> anyhow::Result<ActionProposal> {
    let body = strip_code_fences(raw);
    let decision: RawDecision =
        serde_json::from_str(body).context("decision is not the expected JSON object")?;

    let thrust_direction = decision
        .recommended_thrust_direction
        .trim()
        .parse::<ThrustDirection>()
        .with_context(|| {
            format!(
                "unknown thrust direction {:?}",
                decision.recommended_thrust_direction
            )
        })?;

    Ok(ActionProposal::new(
        ManeuverAction::from(decision.action.trim().to_string()),
        decision.reasoning,
        decision.confidence_score,
        thrust_direction,
    ))
}

/// Threshold rule the prompt asks the model to follow.
pub fn expected_action(risk: &RiskReport) -> ManeuverAction {
    if risk.collision_probability > CRITICAL_PROBABILITY {
        ManeuverAction::FireThrusters
    } else {
        ManeuverAction::HoldPosition
    }
}
