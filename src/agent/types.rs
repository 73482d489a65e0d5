use serde::{Deserialize, Serialize};

/// Reasoning string carried by the safety fallback proposal.
pub const SAFETY_FALLBACK_REASONING: &str = "AI_ERROR_FALLBACK";

/// Spacecraft action. Unknown strings are kept verbatim so the validator can
/// still inspect them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ManeuverAction {
    FireThrusters,
    HoldPosition,
    Other(String),
}

impl ManeuverAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FireThrusters => "FIRE_THRUSTERS",
            Self::HoldPosition => "HOLD_POSITION",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ManeuverAction {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "FIRE_THRUSTERS" => Self::FireThrusters,
            "HOLD_POSITION" => Self::HoldPosition,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for ManeuverAction {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<ManeuverAction> for String {
    fn from(action: ManeuverAction) -> Self {
        match action {
            ManeuverAction::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ManeuverAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ThrustDirection {
    Prograde,
    Retrograde,
    #[default]
    None,
}

/// A candidate action from a proposer. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionProposal {
    pub action: ManeuverAction,
    pub reasoning: String,
    #[serde(rename = "confidence_score")]
    pub confidence: f64,
    #[serde(rename = "recommended_thrust_direction")]
    pub thrust_direction: ThrustDirection,
}

impl ActionProposal {
    pub fn new(
        action: impl Into<ManeuverAction>,
        reasoning: impl Into<String>,
        confidence: f64,
        thrust_direction: ThrustDirection,
    ) -> Self {
        Self {
            action: action.into(),
            reasoning: reasoning.into(),
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
            thrust_direction,
        }
    }

    /// Substituted whenever a proposer cannot produce a usable answer.
    pub fn safety_fallback() -> Self {
        Self::new(
            ManeuverAction::HoldPosition,
            SAFETY_FALLBACK_REASONING,
            0.0,
            ThrustDirection::None,
        )
    }

    pub fn is_safety_fallback(&self) -> bool {
        self.action == ManeuverAction::HoldPosition && self.reasoning == SAFETY_FALLBACK_REASONING
    }
}
