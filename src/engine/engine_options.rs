use crate::config::Config;
use core::num::NonZeroUsize;
use core::time::Duration;

/// How the engine schedules one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum number of checks executing at once. Unbounded when unset.
    pub concurrency: Option<NonZeroUsize>,

    /// Time after which running checks are asked to stop and pending checks are not started.
    pub deadline: Option<Duration>,

    /// Time a check may keep running after the deadline before its task is aborted.
    pub cancel_grace: Duration,
}

impl EngineOptions {
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub const fn with_cancel_grace(mut self, cancel_grace: Duration) -> Self {
        self.cancel_grace = cancel_grace;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            concurrency: None,
            deadline: None,
            cancel_grace: Duration::from_secs(10),
        }
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: usize::try_from(config.concurrency).ok().and_then(NonZeroUsize::new),
            deadline: config.deadline,
            cancel_grace: config.cancel_grace,
        }
    }
}
