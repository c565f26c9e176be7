//! Folds compliance reports into one flat result set with per-status counts.

mod aggregate_report;
mod summary;

pub use aggregate_report::{AggregateReport, aggregate};
pub use summary::Summary;
