use super::CheckFailure;
use crate::checks::CheckDescriptor;
use crate::outcome::{ComplianceReport, ResourceOutcome};
use core::time::Duration;
use strum::Display;

/// Where a check invocation is in its lifecycle.
///
/// Every invocation goes `Pending → Running → Completed | Failed`; a run cancelled before a
/// check starts goes straight from `Pending` to `Failed`. There are no retry states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CheckState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl CheckState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// The result of running one check through the engine.
#[derive(Debug, Clone)]
pub struct CheckRun {
    descriptor: CheckDescriptor,
    result: Result<ComplianceReport, CheckFailure>,
    elapsed: Duration,
}

impl CheckRun {
    #[must_use]
    pub const fn new(descriptor: CheckDescriptor, result: Result<ComplianceReport, CheckFailure>, elapsed: Duration) -> Self {
        Self {
            descriptor,
            result,
            elapsed,
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn result(&self) -> &Result<ComplianceReport, CheckFailure> {
        &self.result
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub const fn state(&self) -> CheckState {
        match self.result {
            Ok(_) => CheckState::Completed,
            Err(_) => CheckState::Failed,
        }
    }

    /// The check's report, with a failure turned into a single `ERROR` outcome named after the
    /// check.
    #[must_use]
    pub fn report(&self) -> ComplianceReport {
        match &self.result {
            Ok(report) => report.clone(),
            Err(failure) => failure_report(&self.descriptor, failure),
        }
    }

    #[must_use]
    pub fn into_report(self) -> ComplianceReport {
        match self.result {
            Ok(report) => report,
            Err(failure) => failure_report(&self.descriptor, &failure),
        }
    }
}

fn failure_report(descriptor: &CheckDescriptor, failure: &CheckFailure) -> ComplianceReport {
    ComplianceReport::single(ResourceOutcome::error(
        &*descriptor.title,
        format!("Error running check: {failure}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Severity;
    use crate::outcome::Status;

    fn descriptor() -> CheckDescriptor {
        CheckDescriptor::new("Disks are encrypted", "Compute Engine", Severity::High)
    }

    #[test]
    fn test_completed_run_returns_its_report() {
        let report = ComplianceReport::single(ResourceOutcome::pass("disk-1"));
        let run = CheckRun::new(descriptor(), Ok(report.clone()), Duration::from_millis(5));

        assert_eq!(run.state(), CheckState::Completed);
        assert_eq!(run.report(), report);
        assert_eq!(run.elapsed(), Duration::from_millis(5));
        assert_eq!(run.into_report(), report);
    }

    #[test]
    fn test_failed_run_becomes_error_outcome() {
        let run = CheckRun::new(descriptor(), Err(CheckFailure::Panicked("boom".to_string())), Duration::ZERO);

        assert_eq!(run.state(), CheckState::Failed);
        let report = run.report();
        assert_eq!(report.len(), 1);
        let outcome = &report.outcomes()[0];
        assert_eq!(outcome.status(), Status::Error);
        assert_eq!(outcome.resource_name(), "Disks are encrypted");
        assert_eq!(outcome.message(), Some("Error running check: check panicked: boom"));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!CheckState::Pending.is_terminal());
        assert!(!CheckState::Running.is_terminal());
        assert!(CheckState::Completed.is_terminal());
        assert!(CheckState::Failed.is_terminal());
        assert_eq!(CheckState::Running.to_string(), "running");
    }
}
