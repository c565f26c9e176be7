use super::{ResourceOutcome, Status};
use serde::{Deserialize, Serialize};

/// The ordered outcomes produced by one check invocation.
///
/// A finished report always holds at least one outcome; a scope without relevant resources is
/// reported as a single `NOT_APPLICABLE` outcome. The empty state only exists while a check is
/// still building its report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    checks: Vec<ResourceOutcome>,
}

impl ComplianceReport {
    #[must_use]
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// A report made of exactly one outcome.
    #[must_use]
    pub fn single(outcome: ResourceOutcome) -> Self {
        Self { checks: vec![outcome] }
    }

    pub fn push(&mut self, outcome: ResourceOutcome) {
        self.checks.push(outcome);
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ResourceOutcome] {
        &self.checks
    }

    #[must_use]
    pub fn into_outcomes(self) -> Vec<ResourceOutcome> {
        self.checks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Count the outcomes carrying `status`.
    #[must_use]
    pub fn count(&self, status: Status) -> usize {
        self.checks.iter().filter(|o| o.status() == status).count()
    }
}

impl From<Vec<ResourceOutcome>> for ComplianceReport {
    fn from(checks: Vec<ResourceOutcome>) -> Self {
        Self { checks }
    }
}

impl FromIterator<ResourceOutcome> for ComplianceReport {
    fn from_iter<I: IntoIterator<Item = ResourceOutcome>>(iter: I) -> Self {
        Self {
            checks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ComplianceReport {
    type Item = &'a ResourceOutcome;
    type IntoIter = core::slice::Iter<'a, ResourceOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.checks.iter()
    }
}
