//! Progress reporting while the engine works through a registry.

mod check_tracker;
mod progress_reporter;

pub use check_tracker::CheckTracker;
pub use progress_reporter::{ProgressReporter, VisibilityTaskGuard};

use crate::checks::CheckDescriptor;
use crate::engine::CheckState;
use core::fmt::Debug;

/// Receives lifecycle notifications from the engine.
///
/// Calls come from several tasks at once, so implementations do their own synchronization.
/// `index` is the check's position in the registry being run. Every check is reported as
/// [`CheckState::Pending`] right after `run_started`, before any of them runs.
pub trait Progress: Send + Sync + Debug {
    fn run_started(&self, _total: usize) {}

    fn check_changed(&self, _index: usize, _descriptor: &CheckDescriptor, _state: CheckState) {}

    fn run_finished(&self) {}
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}
