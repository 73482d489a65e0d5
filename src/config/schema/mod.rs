mod core;
mod decision;
mod gateway;
mod policy;
mod proposer;
mod storage;
mod telemetry;

pub use core::Config;
pub use decision::DecisionConfig;
pub use gateway::GatewayConfig;
pub use policy::PolicyConfig;
pub use proposer::{ProposerBackend, ProposerConfig};
pub use storage::StorageConfig;
pub use telemetry::TelemetryConfig;
