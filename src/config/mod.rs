pub mod schema;

pub use schema::{
    Config, DecisionConfig, GatewayConfig, PolicyConfig, ProposerBackend, ProposerConfig,
    StorageConfig, TelemetryConfig,
};
