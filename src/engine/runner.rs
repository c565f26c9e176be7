use super::{CheckFailure, CheckRun, CheckState, EngineOptions};
use crate::checks::{Cancellation, CancellationSource, Check, CheckContext, Registry};
use crate::outcome::ComplianceReport;
use crate::progress::{NoProgress, Progress};
use core::any::Any;
use core::time::Duration;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Log target for the engine
const LOG_TARGET: &str = "engine";

/// Runs every check of a registry and collects one [`CheckRun`] per check.
///
/// Each check executes in its own task, so a panic or a hang in one check never affects the
/// others. Results come back in registry order regardless of the order checks finish in.
#[derive(Debug, Clone)]
pub struct Engine {
    options: EngineOptions,
    progress: Arc<dyn Progress>,
}

impl Engine {
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            progress: Arc::new(NoProgress),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Run every check in `registry` against `scope`.
    pub async fn run(&self, registry: &Registry, scope: Option<&str>) -> Vec<CheckRun> {
        self.run_until(registry, scope, Cancellation::never()).await
    }

    /// Run every check in `registry`, stopping early once `cancellation` fires.
    ///
    /// Cancellation and the configured deadline behave the same way: checks still waiting for
    /// a concurrency slot are reported as [`CheckFailure::Cancelled`], and running checks see their own
    /// token cancelled. With a deadline, a check still running `cancel_grace` after it is
    /// aborted and reported as [`CheckFailure::TimedOut`].
    pub async fn run_until(&self, registry: &Registry, scope: Option<&str>, cancellation: Cancellation) -> Vec<CheckRun> {
        let total = registry.len();
        let start = Instant::now();

        match (self.options.concurrency, self.options.deadline) {
            (Some(limit), Some(deadline)) => log::info!(
                target: LOG_TARGET,
                "Running {total} check(s), at most {limit} at a time, deadline in {:.1}s",
                deadline.as_secs_f64()
            ),
            (Some(limit), None) => log::info!(target: LOG_TARGET, "Running {total} check(s), at most {limit} at a time"),
            (None, Some(deadline)) => log::info!(
                target: LOG_TARGET,
                "Running {total} check(s) at once, deadline in {:.1}s",
                deadline.as_secs_f64()
            ),
            (None, None) => log::info!(target: LOG_TARGET, "Running {total} check(s) at once"),
        }

        self.progress.run_started(total);
        for (index, check) in registry.iter().enumerate() {
            self.progress.check_changed(index, check.descriptor(), CheckState::Pending);
        }

        let source = CancellationSource::new();
        if cancellation.is_cancelled() {
            source.cancel();
        }

        let soft_deadline = self.options.deadline.map(|d| start + d);
        let hard_deadline = soft_deadline.map(|d| d + self.options.cancel_grace);
        let _watcher = RunWatcher::spawn(source.clone(), cancellation, soft_deadline);

        // Permits are handed out in request order, so checks start in registry order while a
        // slot freed by any check is reused immediately.
        let slots = self.options.concurrency.map(|limit| Semaphore::new(limit.get()));
        let scope: Option<Arc<str>> = scope.map(Arc::from);
        let runs = futures::future::join_all(registry.iter().enumerate().map(|(index, check)| {
            let ctx = CheckContext::new(scope.clone(), source.token());
            self.schedule_check(slots.as_ref(), index, Arc::clone(check), ctx, hard_deadline)
        }))
        .await;

        let failed = runs.iter().filter(|run| run.state() == CheckState::Failed).count();
        log::info!(
            target: LOG_TARGET,
            "Finished {total} check(s) in {:.3}s, {failed} could not produce a report",
            start.elapsed().as_secs_f64()
        );
        self.progress.run_finished();

        runs
    }

    async fn schedule_check(
        &self,
        slots: Option<&Semaphore>,
        index: usize,
        check: Arc<dyn Check>,
        ctx: CheckContext,
        hard_deadline: Option<Instant>,
    ) -> CheckRun {
        let _permit = match slots {
            Some(slots) => slots.acquire().await.ok(),
            None => None,
        };
        self.run_check(index, check, ctx, hard_deadline).await
    }

    async fn run_check(&self, index: usize, check: Arc<dyn Check>, ctx: CheckContext, hard_deadline: Option<Instant>) -> CheckRun {
        let descriptor = check.descriptor().clone();

        if ctx.cancellation().is_cancelled() {
            log::debug!(target: LOG_TARGET, "Not starting check '{}', the run was cancelled", descriptor.title);
            let run = CheckRun::new(descriptor, Err(CheckFailure::Cancelled), Duration::ZERO);
            self.progress.check_changed(index, run.descriptor(), run.state());
            return run;
        }

        log::debug!(target: LOG_TARGET, "Starting check '{}'", descriptor.title);
        self.progress.check_changed(index, &descriptor, CheckState::Running);

        let started = Instant::now();
        let result = execute_isolated(check, ctx, hard_deadline).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(report) => log::debug!(
                target: LOG_TARGET,
                "Check '{}' produced {} outcome(s) in {:.3}s",
                descriptor.title,
                report.len(),
                elapsed.as_secs_f64()
            ),
            Err(failure) => log::warn!(target: LOG_TARGET, "Check '{}' failed: {failure}", descriptor.title),
        }

        let run = CheckRun::new(descriptor, result, elapsed);
        self.progress.check_changed(index, run.descriptor(), run.state());
        run
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

async fn execute_isolated(check: Arc<dyn Check>, ctx: CheckContext, hard_deadline: Option<Instant>) -> Result<ComplianceReport, CheckFailure> {
    let mut handle = tokio::spawn(async move { check.execute(&ctx).await });

    let joined = match hard_deadline {
        Some(deadline) => {
            let Ok(joined) = tokio::time::timeout_at(deadline, &mut handle).await else {
                handle.abort();
                return Err(CheckFailure::TimedOut);
            };
            joined
        }
        None => handle.await,
    };

    match joined {
        Ok(report) if report.is_empty() => Err(CheckFailure::EmptyReport),
        Ok(report) => Ok(report),
        Err(e) if e.is_panic() => Err(CheckFailure::Panicked(panic_message(e.into_panic()))),
        Err(_) => Err(CheckFailure::Aborted),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Cancels the run's checks when the caller cancels or the deadline passes.
///
/// The watching task is aborted when this is dropped.
#[derive(Debug)]
struct RunWatcher(JoinHandle<()>);

impl RunWatcher {
    fn spawn(source: CancellationSource, external: Cancellation, deadline: Option<Instant>) -> Self {
        Self(tokio::spawn(async move {
            let expired = async {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => core::future::pending().await,
                }
            };

            tokio::select! {
                () = external.cancelled() => {
                    log::info!(target: LOG_TARGET, "Run cancelled, asking running checks to stop");
                }
                () = expired => {
                    log::warn!(target: LOG_TARGET, "Run deadline reached, asking running checks to stop");
                }
            }

            source.cancel();
        }))
    }
}

impl Drop for RunWatcher {
    fn drop(&mut self) {
        self.0.abort();
    }
}
