use crate::Result;
use crate::aggregate::{AggregateReport, Summary};
use crate::checks::{CheckDescriptor, Control, Severity};
use crate::engine::CheckRun;
use crate::outcome::ResourceOutcome;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct RunDocument<'a> {
    scope: Option<&'a str>,
    generated_at: DateTime<Utc>,
    checks: Vec<CheckEntry<'a>>,
    summary: Summary,
}

#[derive(Serialize)]
struct CheckEntry<'a> {
    #[serde(flatten)]
    descriptor: DescriptorEntry<'a>,
    elapsed_ms: u64,
    checks: Vec<ResourceOutcome>,
}

#[derive(Serialize)]
struct DescriptorEntry<'a> {
    title: &'a str,
    description: &'a str,
    severity: Severity,
    service_name: &'a str,
    short_service_name: Option<&'a str>,
    controls: &'a [Control],
}

impl<'a> From<&'a CheckDescriptor> for DescriptorEntry<'a> {
    fn from(descriptor: &'a CheckDescriptor) -> Self {
        Self {
            title: &descriptor.title,
            description: &descriptor.description,
            severity: descriptor.severity,
            service_name: &descriptor.service_name,
            short_service_name: descriptor.short_service_name.as_deref(),
            controls: &descriptor.controls,
        }
    }
}

/// Write the runs as one pretty-printed JSON document.
///
/// # Errors
///
/// Returns an error if serialization or writing to `writer` fails
pub fn generate<W: Write>(runs: &[CheckRun], scope: Option<&str>, generated_at: DateTime<Utc>, writer: &mut W) -> Result<()> {
    let checks = runs
        .iter()
        .map(|run| CheckEntry {
            descriptor: DescriptorEntry::from(run.descriptor()),
            elapsed_ms: u64::try_from(run.elapsed().as_millis()).unwrap_or(u64::MAX),
            checks: run.report().into_outcomes(),
        })
        .collect();

    let document = RunDocument {
        scope,
        generated_at,
        checks,
        summary: AggregateReport::from_runs(runs).summary(),
    };

    serde_json::to_writer_pretty(&mut *writer, &document).context("serializing run report")?;
    writeln!(writer)?;
    Ok(())
}

/// Write the descriptors as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing to `writer` fails
pub fn generate_catalog<'a, W: Write>(descriptors: impl IntoIterator<Item = &'a CheckDescriptor>, writer: &mut W) -> Result<()> {
    let entries: Vec<_> = descriptors.into_iter().map(DescriptorEntry::from).collect();
    serde_json::to_writer_pretty(&mut *writer, &entries).context("serializing check catalog")?;
    writeln!(writer)?;
    Ok(())
}
