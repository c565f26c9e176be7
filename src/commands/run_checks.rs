use super::common::{SelectionArgs, exit_code, init_logging};
use super::host::Host;
use crate::Result;
use crate::aggregate::AggregateReport;
use crate::checks::Registry;
use crate::config::Config;
use crate::engine::{Engine, EngineOptions};
use crate::progress::{CheckTracker, NoProgress, Progress, ProgressReporter};
use crate::reports::{ColorMode, ReportFormat, generate_console, generate_json};
use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use core::time::Duration;
use log::LevelFilter;
use std::io::IsTerminal;
use std::sync::Arc;

/// Log target for commands
const LOG_TARGET: &str = "commands";

/// How long a run must last before the progress bar appears.
const PROGRESS_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Region, project or subscription to inspect; defaults to the configuration, then to each
    /// provider's environment
    #[arg(long, value_name = "SCOPE")]
    pub scope: Option<String>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Maximum number of checks running at once, 0 for no limit
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Overall time budget for the run, e.g. "90s" or "5m"
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub deadline: Option<Duration>,

    /// Configuration file; defaults to `posture.toml` in the working directory when present
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// When to color console output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Log level (off, error, warn, info, debug, trace); overrides `RUST_LOG`
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LevelFilter>,
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    let duration = humantime_serde::re::humantime::parse_duration(s).map_err(|e| e.to_string())?;
    if duration.is_zero() {
        return Err("deadline must be greater than zero".to_string());
    }
    Ok(duration)
}

impl RunArgs {
    /// Layer the command-line overrides on top of `config` and validate the combination.
    fn apply_to(&self, config: &mut Config) -> Result<()> {
        if let Some(concurrency) = self.concurrency {
            config.concurrency = u32::try_from(concurrency).context("--concurrency is too large")?;
        }
        if self.deadline.is_some() {
            config.deadline = self.deadline;
        }
        if self.scope.is_some() {
            config.scope.clone_from(&self.scope);
        }
        config.validate().context("validating command-line options")
    }
}

pub async fn run_checks<H: Host>(host: &mut H, registry: &Registry, args: &RunArgs) -> Result<i32> {
    init_logging(args.log_level);

    let cwd = std::env::current_dir().context("reading the working directory")?;
    let cwd = Utf8PathBuf::try_from(cwd).context("the working directory is not valid UTF-8")?;
    let mut config = Config::load(&cwd, args.config.as_ref())?;
    args.apply_to(&mut config)?;
    let scope = config.scope.clone();

    let selected = registry.select(&args.selection.to_selection());
    if selected.is_empty() {
        bail!("no registered check matches the given filters");
    }

    let show_progress = args.format == ReportFormat::Console && std::io::stderr().is_terminal();
    let reporter = ProgressReporter::new(PROGRESS_DELAY);
    let progress: Arc<dyn Progress> = if show_progress {
        Arc::new(CheckTracker::new(reporter.clone()))
    } else {
        Arc::new(NoProgress)
    };

    let options = EngineOptions::from(&config);
    log::debug!(target: LOG_TARGET, "Engine options: {options:?}, scope: {scope:?}");
    let engine = Engine::new(options).with_progress(progress);

    let runs = {
        let _visibility = show_progress.then(|| reporter.start_visibility_checking());
        engine.run(&selected, scope.as_deref()).await
    };

    match args.format {
        ReportFormat::Console => {
            let use_colors = args.color.use_colors(std::io::stdout().is_terminal());
            generate_console(&runs, use_colors, &mut host.output())?;
        }
        ReportFormat::Json => generate_json(&runs, scope.as_deref(), chrono::Utc::now(), &mut host.output())?,
    }

    Ok(exit_code(AggregateReport::from_runs(&runs).summary()))
}
