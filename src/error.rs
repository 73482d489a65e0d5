use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `orbitwarden`.
///
/// Only failures the caller must act on live here: configuration problems,
/// state durability, and risk-source failures. Proposer and policy-tier
/// failures never surface as errors; they are absorbed into data values
/// (safety fallback proposal, fail-open verdict). Internal adapters continue
/// to use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum WardenError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Spacecraft state ────────────────────────────────────────────────
    #[error("state: {0}")]
    State(#[from] StateError),

    // ── Risk source ─────────────────────────────────────────────────────
    #[error("risk source: {0}")]
    Risk(#[from] RiskError),

    // ── Event log ───────────────────────────────────────────────────────
    #[error("event log: {0}")]
    EventLog(#[from] EventLogError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── State store errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to persist state to {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Risk source errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("telemetry fetch failed: {0}")]
    Fetch(String),

    #[error("invalid TLE: {0}")]
    InvalidTle(String),

    #[error("propagation failed: {0}")]
    Propagation(String),
}

// ─── Event log errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, WardenError>;
