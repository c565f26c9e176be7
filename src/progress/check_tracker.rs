//! Per-service progress accounting for a check run.

use super::{Progress, ProgressReporter};
use crate::checks::CheckDescriptor;
use crate::engine::CheckState;
use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct ServiceCounter {
    started: AtomicU64,
    finished: AtomicU64,
    failed: AtomicU64,
}

/// Tracks how many checks of each service have started and finished, and mirrors that onto
/// a [`ProgressReporter`].
///
/// Services are keyed by their short name when the check has one.
#[derive(Debug, Clone)]
pub struct CheckTracker {
    counters: Arc<Mutex<BTreeMap<String, Arc<ServiceCounter>>>>,
    total: Arc<AtomicU64>,
    progress: ProgressReporter,
}

impl CheckTracker {
    #[must_use]
    pub fn new(progress: ProgressReporter) -> Self {
        Self {
            counters: Arc::new(Mutex::new(BTreeMap::new())),
            total: Arc::new(AtomicU64::new(0)),
            progress,
        }
    }

    fn get_counter(&self, service: &str) -> Arc<ServiceCounter> {
        let mut counters = self.counters.lock().expect("lock poisoned");
        Arc::clone(counters.entry(service.to_string()).or_default())
    }

    /// Number of checks that reached a terminal state, and how many of those failed.
    #[must_use]
    pub fn finished(&self) -> (u64, u64) {
        let counters = self.counters.lock().expect("lock poisoned");
        counters.values().fold((0, 0), |(finished, failed), c| {
            (
                finished + c.finished.load(Ordering::Relaxed),
                failed + c.failed.load(Ordering::Relaxed),
            )
        })
    }

    /// The progress message: `finished/started service` per service, in name order.
    #[must_use]
    pub fn message(&self) -> String {
        let counters = self.counters.lock().expect("lock poisoned");
        let parts: Vec<_> = counters
            .iter()
            .filter_map(|(name, counter)| {
                let started = counter.started.load(Ordering::Relaxed);
                (started > 0).then(|| format!("{}/{started} {name}", counter.finished.load(Ordering::Relaxed)))
            })
            .collect();

        if parts.is_empty() {
            "Waiting for checks".to_string()
        } else {
            parts.join(", ")
        }
    }

    fn update_progress(&self) {
        let (finished, _) = self.finished();
        self.progress.set_length(self.total.load(Ordering::Relaxed));
        self.progress.set_position(finished);
        self.progress.set_message(self.message());
    }
}

impl Progress for CheckTracker {
    fn run_started(&self, total: usize) {
        self.total.store(total as u64, Ordering::Relaxed);
        self.progress.set_prefix("Checking");
        self.update_progress();
    }

    fn check_changed(&self, _index: usize, descriptor: &CheckDescriptor, state: CheckState) {
        let service = descriptor.short_service_name.as_deref().unwrap_or(&descriptor.service_name);
        let counter = self.get_counter(service);

        match state {
            CheckState::Pending => return,
            CheckState::Running => {
                let _ = counter.started.fetch_add(1, Ordering::Relaxed);
            }
            CheckState::Completed => {
                let _ = counter.finished.fetch_add(1, Ordering::Relaxed);
            }
            CheckState::Failed => {
                let _ = counter.finished.fetch_add(1, Ordering::Relaxed);
                let _ = counter.failed.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.update_progress();
    }

    fn run_finished(&self) {
        self.progress.finish_and_clear();
    }
}
