use super::Summary;
use crate::engine::CheckRun;
use crate::outcome::{ComplianceReport, ResourceOutcome};
use serde::Serialize;

/// Every outcome of a set of reports, in report order, with their status counts.
///
/// Built in one go from its inputs and never updated afterwards; aggregate again to get a new
/// view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    checks: Vec<ResourceOutcome>,
    summary: Summary,
}

impl AggregateReport {
    /// Aggregate the engine's output, with failed checks contributing their `ERROR` outcome.
    #[must_use]
    pub fn from_runs(runs: &[CheckRun]) -> Self {
        let mut checks = Vec::new();
        for run in runs {
            checks.extend(run.report().into_outcomes());
        }
        Self::from_outcomes(checks)
    }

    fn from_outcomes(checks: Vec<ResourceOutcome>) -> Self {
        let summary = Summary::of(&checks);
        Self { checks, summary }
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ResourceOutcome] {
        &self.checks
    }

    #[must_use]
    pub const fn summary(&self) -> Summary {
        self.summary
    }
}

/// Concatenate the outcomes of `reports` in order and count them by status.
///
/// Outcomes are never deduplicated: the same resource judged by two checks appears twice. An
/// empty report contributes nothing.
#[must_use]
pub fn aggregate<'a>(reports: impl IntoIterator<Item = &'a ComplianceReport>) -> AggregateReport {
    AggregateReport::from_outcomes(reports.into_iter().flat_map(|r| r.outcomes().iter().cloned()).collect())
}
