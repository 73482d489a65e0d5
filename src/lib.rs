#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod agent;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod learning;
pub mod llm;
pub mod security;
pub mod state;
pub mod telemetry;

pub use agent::{ActionProposal, DecisionLoop, LoopOutcome, Mission};
pub use config::Config;
pub use error::{Result, WardenError};
pub use security::{ValidationResult, Validator};
pub use state::{SpacecraftState, StateStore};
pub use telemetry::{RiskReport, RiskSource};
