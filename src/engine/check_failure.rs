use thiserror::Error;

/// Why the engine could not obtain a report from a check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    /// The check panicked; the payload message is kept when it is a string.
    #[error("check panicked: {0}")]
    Panicked(String),

    /// The check was still running after the deadline plus the cancellation grace period.
    #[error("check did not finish before the run deadline and was aborted")]
    TimedOut,

    /// The run was cancelled before the check started.
    #[error("check was cancelled before it started")]
    Cancelled,

    /// The check's task was aborted from outside the engine.
    #[error("check task was aborted")]
    Aborted,

    /// The check returned a report without any outcome.
    #[error("check produced no outcomes")]
    EmptyReport,
}
