//! Delayed progress bar for a check run.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Instant;

const TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {msg}";

#[derive(Debug)]
struct DelayedProgressState {
    start_time: Instant,
    delay: Duration,
    visible: AtomicBool,
    has_content: AtomicBool,
}

/// A progress bar that stays hidden until the run has lasted longer than `delay`.
///
/// Short runs finish without ever drawing, so quick invocations and piped output stay clean.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    state: Arc<DelayedProgressState>,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE)
                .expect("Failed to create progress style")
                .progress_chars("=> "),
        );
        bar.set_length(0);
        bar.set_draw_target(ProgressDrawTarget::hidden());

        Self {
            bar,
            state: Arc::new(DelayedProgressState {
                start_time: Instant::now(),
                delay,
                visible: AtomicBool::new(false),
                has_content: AtomicBool::new(false),
            }),
        }
    }

    fn ensure_visible(&self) {
        if !self.state.visible.load(Ordering::Relaxed)
            && self.state.has_content.load(Ordering::Relaxed)
            && self.state.start_time.elapsed() >= self.state.delay
        {
            self.state.visible.store(true, Ordering::Relaxed);
            self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }
    }

    pub fn set_length(&self, len: u64) {
        if len > 0 {
            self.state.has_content.store(true, Ordering::Relaxed);
        }
        self.ensure_visible();
        self.bar.set_length(len);
    }

    pub fn set_position(&self, pos: u64) {
        self.ensure_visible();
        self.bar.set_position(pos);
    }

    pub fn set_message(&self, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        if !msg.is_empty() {
            self.state.has_content.store(true, Ordering::Relaxed);
        }
        self.ensure_visible();
        self.bar.set_message(msg.to_string());
    }

    pub fn set_prefix(&self, prefix: &str) {
        self.bar.set_prefix(prefix.to_string());
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.visible.load(Ordering::Relaxed)
    }

    /// Finish and clear the bar, if it was ever drawn.
    pub fn finish_and_clear(&self) {
        if self.state.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }

    /// Start a background task that shows the bar once the delay has passed, even while no
    /// check changes state.
    ///
    /// The task is aborted when the returned guard is dropped.
    #[must_use]
    pub fn start_visibility_checking(&self) -> VisibilityTaskGuard {
        let progress = self.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(250));
            loop {
                let _ = interval.tick().await;
                if !progress.is_visible() {
                    progress.ensure_visible();
                }
            }
        });
        VisibilityTaskGuard(task)
    }
}

/// Aborts the visibility task when dropped.
#[derive(Debug)]
pub struct VisibilityTaskGuard(tokio::task::JoinHandle<()>);

impl Drop for VisibilityTaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stays_hidden_before_delay() {
        let progress = ProgressReporter::new(Duration::from_secs(3600));
        progress.set_length(10);
        progress.set_message("1/10 Amazon S3");
        assert!(!progress.is_visible());
        progress.finish_and_clear();
    }

    #[test]
    fn test_needs_content_to_show() {
        let progress = ProgressReporter::new(Duration::ZERO);
        progress.set_length(0);
        progress.set_message("");
        assert!(!progress.is_visible());
    }
}
