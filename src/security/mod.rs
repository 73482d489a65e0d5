pub mod deny_list;
pub mod policy_client;
pub mod types;
pub mod validator;

pub use deny_list::{DEFAULT_BLOCKED_KEYWORDS, DenyList};
pub use policy_client::{
    HttpPolicyClient, PolicyCheckRequest, PolicyCheckResponse, PolicyClient, PolicyMessage,
};
pub use types::{ValidationResult, ValidationSource};
pub use validator::{RemotePolicy, Validator, format_rejection_message};
