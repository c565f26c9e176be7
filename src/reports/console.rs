use crate::Result;
use crate::aggregate::{AggregateReport, Summary};
use crate::checks::{CheckDescriptor, Severity};
use crate::engine::CheckRun;
use crate::outcome::{ResourceOutcome, Status};
use core::fmt::Display;
use owo_colors::{OwoColorize, Style};
use std::io::Write;

struct Painter {
    use_colors: bool,
}

impl Painter {
    fn paint(&self, text: impl Display, style: Style) -> String {
        if self.use_colors {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn severity(&self, severity: Severity) -> String {
        let style = match severity {
            Severity::High => Style::new().red().bold(),
            Severity::Medium => Style::new().yellow(),
            Severity::Low => Style::new().blue(),
        };
        self.paint(format!("[{severity}]"), style)
    }

    fn outcome(&self, outcome: &ResourceOutcome) -> String {
        let style = match outcome.status() {
            Status::Pass => Style::new().green(),
            Status::Fail => Style::new().red(),
            Status::Error => Style::new().yellow(),
            Status::NotApplicable => Style::new().dimmed(),
        };
        self.paint(outcome, style)
    }

    fn header(&self, descriptor: &CheckDescriptor) -> String {
        format!(
            "{} {} {}",
            self.paint(&descriptor.title, Style::new().bold()),
            self.severity(descriptor.severity),
            self.paint(&descriptor.service_name, Style::new().cyan()),
        )
    }
}

/// Write each check's outcomes, then the run's summary counts.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails
pub fn generate<W: Write>(runs: &[CheckRun], use_colors: bool, writer: &mut W) -> Result<()> {
    let painter = Painter { use_colors };

    for run in runs {
        writeln!(
            writer,
            "{} {}",
            painter.header(run.descriptor()),
            painter.paint(format!("({:.2}s)", run.elapsed().as_secs_f64()), Style::new().dimmed())
        )?;

        for outcome in &run.report() {
            writeln!(writer, "  {}", painter.outcome(outcome))?;
        }

        writeln!(writer)?;
    }

    let summary = AggregateReport::from_runs(runs).summary();
    writeln!(writer, "{}", summary_line(&painter, summary, runs.len()))?;

    Ok(())
}

fn summary_line(painter: &Painter, summary: Summary, checks: usize) -> String {
    format!(
        "{} {}, {}, {}, {} ({} outcome(s) from {checks} check(s))",
        painter.paint("Summary:", Style::new().bold()),
        painter.paint(format!("{} passed", summary.pass), Style::new().green()),
        painter.paint(format!("{} failed", summary.fail), Style::new().red()),
        painter.paint(format!("{} errors", summary.error), Style::new().yellow()),
        painter.paint(format!("{} not applicable", summary.na), Style::new().dimmed()),
        summary.total(),
    )
}

/// Write one entry per check: its header, description and controls.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails
pub fn generate_catalog<'a, W: Write>(
    descriptors: impl IntoIterator<Item = &'a CheckDescriptor>,
    use_colors: bool,
    writer: &mut W,
) -> Result<()> {
    let painter = Painter { use_colors };
    let mut count = 0;

    for descriptor in descriptors {
        count += 1;
        writeln!(writer, "{}", painter.header(descriptor))?;
        if !descriptor.description.is_empty() {
            writeln!(writer, "  {}", descriptor.description)?;
        }
        for control in &descriptor.controls {
            writeln!(writer, "  {} {}", painter.paint(&control.id, Style::new().dimmed()), control.document)?;
        }
    }

    writeln!(writer, "{count} check(s)")?;
    Ok(())
}
