//! Per-resource verdicts and the reports checks build from them.

mod compliance_report;
mod resource_outcome;
mod status;

pub use compliance_report::ComplianceReport;
pub use resource_outcome::ResourceOutcome;
pub use status::Status;
