pub mod decision_loop;
pub mod mission;
pub mod prompt;
pub mod proposer;
pub mod types;

pub use decision_loop::{AttemptRecord, DecisionLoop, LoopOutcome, MAX_RETRIES_HARD_CAP};
pub use mission::{
    ActReport, HistoryView, Mission, RestoreReport, ScanReport, StateView, new_session_id,
};
pub use prompt::{DecisionRequest, build_decision_request, parse_decision};
pub use proposer::{LlmProposer, Proposer, RuleBasedProposer, create_proposer};
pub use types::{ActionProposal, ManeuverAction, ThrustDirection};
