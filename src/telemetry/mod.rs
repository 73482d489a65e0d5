pub mod burn;
pub mod simulated;
pub mod tle;
pub mod types;

pub use burn::{BurnPlan, plan_avoidance_burn};
pub use simulated::SimulatedRiskSource;
pub use types::{RiskReport, RiskStatus};

use crate::error::RiskError;
use async_trait::async_trait;

/// What to assess.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub satellite_id: String,
    /// Inject a synthetic critical encounter at the real position.
    pub force_critical: bool,
    /// Caller-supplied element lines, used instead of any fetch.
    pub tle: Option<(String, String)>,
}

impl ScanRequest {
    pub fn new(satellite_id: impl Into<String>) -> Self {
        Self {
            satellite_id: satellite_id.into(),
            ..Self::default()
        }
    }

    pub fn critical(mut self, force_critical: bool) -> Self {
        self.force_critical = force_critical;
        self
    }
}

/// Produces conjunction-risk reports. Failures surface to the caller.
#[async_trait]
pub trait RiskSource: Send + Sync {
    fn name(&self) -> &str;

    async fn assess(&self, request: &ScanRequest) -> Result<RiskReport, RiskError>;
}
