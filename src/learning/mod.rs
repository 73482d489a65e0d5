pub mod event_log;
pub mod insights;

pub use event_log::{Event, EventLog, EventType};
pub use insights::{Insights, summarize};
