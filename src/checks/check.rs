use super::{Cancellation, CheckDescriptor, Provider};
use crate::Result;
use crate::outcome::ComplianceReport;
use async_trait::async_trait;
use core::fmt::{Debug, Formatter, Result as FmtResult};
use core::future::Future;
use std::sync::Arc;

/// What a check receives for one invocation.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    scope: Option<Arc<str>>,
    cancellation: Cancellation,
}

impl CheckContext {
    #[must_use]
    pub fn new(scope: Option<Arc<str>>, cancellation: Cancellation) -> Self {
        Self { scope, cancellation }
    }

    /// The scope requested by the caller, if any.
    #[must_use]
    pub fn requested_scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// The scope this check should inspect, falling back to the provider's environment default.
    ///
    /// # Errors
    ///
    /// Returns an error if no scope was requested and the provider's environment has none.
    pub fn scope_for(&self, provider: Provider) -> Result<Arc<str>> {
        provider.resolve_scope(self.requested_scope())
    }

    #[must_use]
    pub const fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }
}

/// The contract every posture check implements.
///
/// `execute` must resolve and must not fail: API errors, malformed resources and empty scopes
/// are all reported as outcomes inside the returned report. Use
/// [`guard`](super::guard) and [`ReportBuilder`](super::ReportBuilder) to keep to this.
#[async_trait]
pub trait Check: Send + Sync + Debug {
    fn descriptor(&self) -> &CheckDescriptor;

    async fn execute(&self, ctx: &CheckContext) -> ComplianceReport;
}

/// A check assembled from a descriptor and an async function.
pub struct FnCheck<F> {
    descriptor: CheckDescriptor,
    run: F,
}

impl<F, Fut> FnCheck<F>
where
    F: Fn(CheckContext) -> Fut + Send + Sync,
    Fut: Future<Output = ComplianceReport> + Send,
{
    #[must_use]
    pub const fn new(descriptor: CheckDescriptor, run: F) -> Self {
        Self { descriptor, run }
    }
}

#[async_trait]
impl<F, Fut> Check for FnCheck<F>
where
    F: Fn(CheckContext) -> Fut + Send + Sync,
    Fut: Future<Output = ComplianceReport> + Send,
{
    fn descriptor(&self) -> &CheckDescriptor {
        &self.descriptor
    }

    async fn execute(&self, ctx: &CheckContext) -> ComplianceReport {
        (self.run)(ctx.clone()).await
    }
}

impl<F> Debug for FnCheck<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FnCheck").field("descriptor", &self.descriptor).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Severity;
    use crate::outcome::{ResourceOutcome, Status};

    #[tokio::test]
    async fn test_fn_check_passes_context_through() {
        let check = FnCheck::new(CheckDescriptor::new("scope echo", "test", Severity::Low), |ctx: CheckContext| async move {
            let scope = ctx.requested_scope().unwrap_or("none").to_string();
            ComplianceReport::single(ResourceOutcome::pass(scope))
        });

        let ctx = CheckContext::new(Some(Arc::from("eu-west-1")), Cancellation::never());
        let report = check.execute(&ctx).await;

        assert_eq!(report.len(), 1);
        assert_eq!(report.outcomes()[0].resource_name(), "eu-west-1");
        assert_eq!(report.outcomes()[0].status(), Status::Pass);
        assert_eq!(&*check.descriptor().title, "scope echo");
    }

    #[test]
    fn test_scope_for_prefers_requested_scope() {
        let ctx = CheckContext::new(Some(Arc::from("my-project")), Cancellation::never());
        assert_eq!(&*ctx.scope_for(Provider::Gcp).unwrap(), "my-project");
    }

    #[test]
    fn test_debug_shows_descriptor() {
        let check = FnCheck::new(CheckDescriptor::new("debuggable", "test", Severity::Low), |_ctx: CheckContext| async {
            ComplianceReport::new()
        });
        let debug = format!("{check:?}");
        assert!(debug.contains("FnCheck"));
        assert!(debug.contains("debuggable"));
    }
}
