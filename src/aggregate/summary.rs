use crate::outcome::{ResourceOutcome, Status};
use serde::{Deserialize, Serialize};

/// Number of outcomes per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Summary {
    pub pass: usize,
    pub fail: usize,
    pub error: usize,
    pub na: usize,
}

impl Summary {
    /// Count the statuses of `outcomes` in one pass.
    #[must_use]
    pub fn of<'a>(outcomes: impl IntoIterator<Item = &'a ResourceOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome.status());
        }
        summary
    }

    pub const fn record(&mut self, status: Status) {
        match status {
            Status::Pass => self.pass += 1,
            Status::Fail => self.fail += 1,
            Status::Error => self.error += 1,
            Status::NotApplicable => self.na += 1,
        }
    }

    #[must_use]
    pub const fn get(&self, status: Status) -> usize {
        match status {
            Status::Pass => self.pass,
            Status::Fail => self.fail,
            Status::Error => self.error,
            Status::NotApplicable => self.na,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.pass + self.fail + self.error + self.na
    }

    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            pass: self.pass + other.pass,
            fail: self.fail + other.fail,
            error: self.error + other.error,
            na: self.na + other.na,
        }
    }
}
