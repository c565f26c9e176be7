use crate::aggregate::Summary;
use crate::checks::{Selection, Severity};
use clap::Args;
use log::LevelFilter;

/// Every check produced only `PASS` or `NOT_APPLICABLE` outcomes.
pub const EXIT_OK: i32 = 0;

/// Bad arguments or configuration.
pub const EXIT_USAGE: i32 = 1;

/// At least one resource failed its rule.
pub const EXIT_FAILURES: i32 = 2;

/// Compliance could not be determined for at least one resource, and none failed.
pub const EXIT_ERRORS: i32 = 3;

/// The process exit code for a run with the given counts.
#[must_use]
pub const fn exit_code(summary: Summary) -> i32 {
    if summary.fail > 0 {
        EXIT_FAILURES
    } else if summary.error > 0 {
        EXIT_ERRORS
    } else {
        EXIT_OK
    }
}

/// Filters picking checks out of the registry.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Only checks for this service (full or short name); may be repeated
    #[arg(long = "service", value_name = "SERVICE")]
    pub services: Vec<String>,

    /// Only checks of this severity; may be repeated
    #[arg(long = "severity", value_name = "LEVEL", value_enum)]
    pub severities: Vec<Severity>,

    /// Only checks whose title contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,
}

impl SelectionArgs {
    #[must_use]
    pub fn to_selection(&self) -> Selection {
        Selection {
            services: self.services.clone(),
            severities: self.severities.clone(),
            title: self.title.clone(),
        }
    }
}

/// Install the global logger.
///
/// `RUST_LOG` refines the default `warn` level; an explicit `--log-level` overrides both.
/// Later calls in the same process keep the first logger.
pub fn init_logging(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::new();
    let _ = builder.filter_level(LevelFilter::Warn).parse_default_env();
    if let Some(level) = level {
        let _ = builder.filter_level(level);
    }
    let _ = builder.try_init();
}
