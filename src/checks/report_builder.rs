//! Helpers that keep a check's report within the check contract.

use crate::Result;
use crate::outcome::{ComplianceReport, ResourceOutcome};
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::future::Future;
use futures::{Stream, StreamExt};
use std::sync::Arc;

/// Log target for check helpers
const LOG_TARGET: &str = "checks";

/// A resource was found but lacks a field needed to identify or evaluate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

impl Display for MissingField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "missing required field '{}'", self.0)
    }
}

impl core::error::Error for MissingField {}

/// Unwrap an optional resource field, naming it when absent.
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, MissingField> {
    value.ok_or(MissingField(field))
}

/// Accumulates the outcomes of one check invocation.
#[derive(Debug)]
pub struct ReportBuilder {
    resource_kind: Arc<str>,
    scope: Arc<str>,
    report: ComplianceReport,
}

impl ReportBuilder {
    /// Start a report about `resource_kind` (e.g. `"CloudTrail trails"`) within `scope`.
    #[must_use]
    pub fn new(resource_kind: impl AsRef<str>, scope: impl AsRef<str>) -> Self {
        Self {
            resource_kind: Arc::from(resource_kind.as_ref()),
            scope: Arc::from(scope.as_ref()),
            report: ComplianceReport::new(),
        }
    }

    #[must_use]
    pub fn resource_kind(&self) -> &str {
        &self.resource_kind
    }

    pub fn push(&mut self, outcome: ResourceOutcome) {
        self.report.push(outcome);
    }

    /// Record a resource that could not be evaluated because `missing` is absent.
    pub fn malformed(&mut self, missing: MissingField) {
        log::debug!(target: LOG_TARGET, "Skipping malformed {} in {}: {missing}", self.resource_kind, self.scope);
        self.report.push(ResourceOutcome::error(
            format!("Unknown {}", self.resource_kind),
            format!("{} is {missing}", self.resource_kind),
        ));
    }

    /// Record a failure that stopped data gathering.
    pub fn record_error(&mut self, error: &anyhow::Error) {
        self.report.push(error_outcome(&self.resource_kind, error));
    }

    /// Drain `items`, evaluating each one as it arrives.
    ///
    /// A resource for which `evaluate` reports a [`MissingField`] becomes its own `ERROR`
    /// outcome and the remaining resources are still evaluated. An error from the stream is
    /// recorded once and ends the drain; outcomes produced before it are kept.
    ///
    /// Returns `false` if the stream failed.
    pub async fn evaluate_each<T, S, F>(&mut self, items: S, mut evaluate: F) -> bool
    where
        S: Stream<Item = Result<T>>,
        F: FnMut(T) -> Result<ResourceOutcome, MissingField>,
    {
        let mut items = core::pin::pin!(items);
        while let Some(item) = items.next().await {
            match item {
                Ok(item) => match evaluate(item) {
                    Ok(outcome) => self.push(outcome),
                    Err(missing) => self.malformed(missing),
                },
                Err(e) => {
                    self.record_error(&e);
                    return false;
                }
            }
        }

        true
    }

    /// Finish the report. A report with no outcomes becomes a single `NOT_APPLICABLE` outcome.
    #[must_use]
    pub fn finish(self) -> ComplianceReport {
        if self.report.is_empty() {
            return ComplianceReport::single(ResourceOutcome::not_applicable(
                format!("No {}", self.resource_kind),
                format!("No {} found in {}", self.resource_kind, self.scope),
            ));
        }

        self.report
    }
}

fn error_outcome(resource_kind: &str, error: &anyhow::Error) -> ResourceOutcome {
    ResourceOutcome::error(resource_kind, format!("Error checking {resource_kind}: {error:#}"))
}

/// Run a fallible check body, turning an error into a report with a single `ERROR` outcome.
pub async fn guard<Fut>(resource_kind: &str, body: Fut) -> ComplianceReport
where
    Fut: Future<Output = Result<ComplianceReport>>,
{
    match body.await {
        Ok(report) => report,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Check of {resource_kind} failed: {e:#}");
            ComplianceReport::single(error_outcome(resource_kind, &e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Status;
    use anyhow::anyhow;

    struct Bucket {
        name: Option<&'static str>,
        public: bool,
    }

    fn evaluate_bucket(bucket: Bucket) -> Result<ResourceOutcome, MissingField> {
        let name = require(bucket.name, "Name")?;
        Ok(if bucket.public {
            ResourceOutcome::fail(name, "bucket allows public access")
        } else {
            ResourceOutcome::pass(name)
        })
    }

    #[test]
    fn test_finish_empty_is_not_applicable() {
        let report = ReportBuilder::new("S3 buckets", "us-east-1").finish();
        assert_eq!(report.len(), 1);
        let outcome = &report.outcomes()[0];
        assert_eq!(outcome.status(), Status::NotApplicable);
        assert_eq!(outcome.resource_name(), "No S3 buckets");
        assert_eq!(outcome.message(), Some("No S3 buckets found in us-east-1"));
    }

    #[test]
    fn test_finish_keeps_outcomes() {
        let mut builder = ReportBuilder::new("S3 buckets", "us-east-1");
        builder.push(ResourceOutcome::pass("a"));
        let report = builder.finish();
        assert_eq!(report.outcomes(), [ResourceOutcome::pass("a")]);
    }

    #[tokio::test]
    async fn test_malformed_item_is_isolated() {
        let items = futures::stream::iter(vec![
            Ok(Bucket { name: Some("one"), public: false }),
            Ok(Bucket { name: None, public: true }),
            Ok(Bucket { name: Some("three"), public: true }),
        ]);

        let mut builder = ReportBuilder::new("S3 buckets", "us-east-1");
        assert!(builder.evaluate_each(items, evaluate_bucket).await);
        let report = builder.finish();

        let statuses: Vec<_> = report.outcomes().iter().map(ResourceOutcome::status).collect();
        assert_eq!(statuses, [Status::Pass, Status::Error, Status::Fail]);
        assert_eq!(report.outcomes()[1].resource_name(), "Unknown S3 buckets");
        assert_eq!(
            report.outcomes()[1].message(),
            Some("S3 buckets is missing required field 'Name'")
        );
    }

    #[tokio::test]
    async fn test_stream_error_keeps_earlier_outcomes_and_stops() {
        let items = futures::stream::iter(vec![
            Ok(Bucket { name: Some("one"), public: false }),
            Err(anyhow!("throttled")),
            Ok(Bucket { name: Some("never"), public: false }),
        ]);

        let mut builder = ReportBuilder::new("S3 buckets", "us-east-1");
        assert!(!builder.evaluate_each(items, evaluate_bucket).await);
        let report = builder.finish();

        assert_eq!(report.len(), 2);
        assert_eq!(report.outcomes()[0].status(), Status::Pass);
        assert_eq!(report.outcomes()[1].status(), Status::Error);
        assert_eq!(report.outcomes()[1].message(), Some("Error checking S3 buckets: throttled"));
    }

    #[tokio::test]
    async fn test_first_call_failure_is_single_error() {
        let items = futures::stream::iter(vec![Err::<Bucket, _>(anyhow!("AccessDenied"))]);

        let mut builder = ReportBuilder::new("S3 buckets", "us-east-1");
        let _ = builder.evaluate_each(items, evaluate_bucket).await;
        let report = builder.finish();

        assert_eq!(report.len(), 1);
        assert_eq!(report.count(Status::Error), 1);
        assert_eq!(report.count(Status::Pass) + report.count(Status::Fail), 0);
    }

    #[tokio::test]
    async fn test_guard_converts_error() {
        let report = guard("IAM users", async { Err(anyhow!("expired token")) }).await;
        assert_eq!(report.len(), 1);
        let outcome = &report.outcomes()[0];
        assert_eq!(outcome.status(), Status::Error);
        assert_eq!(outcome.message(), Some("Error checking IAM users: expired token"));
    }

    #[tokio::test]
    async fn test_guard_passes_report_through() {
        let report = guard("IAM users", async { Ok(ComplianceReport::single(ResourceOutcome::pass("root"))) }).await;
        assert_eq!(report.outcomes(), [ResourceOutcome::pass("root")]);
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some(3), "Id"), Ok(3));
        assert_eq!(require::<u8>(None, "Id"), Err(MissingField("Id")));
        assert_eq!(MissingField("Arn").to_string(), "missing required field 'Arn'");
    }
}
