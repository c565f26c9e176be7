//! Command-line surface: argument parsing, logging setup and exit codes.

mod common;
mod host;
mod init;
mod list;
mod run_checks;

pub use common::{EXIT_ERRORS, EXIT_FAILURES, EXIT_OK, EXIT_USAGE, SelectionArgs, exit_code};
pub use host::{Host, StdHost};
pub use init::InitArgs;
pub use list::ListArgs;
pub use run_checks::RunArgs;

use crate::checks::Registry;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::io::Write;

#[derive(Debug, Parser)]
#[command(name = "posture", version, about = "Check cloud resources against security and compliance rules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the registered checks
    List(ListArgs),

    /// Run the selected checks and report their outcomes
    Run(RunArgs),

    /// Write a default configuration file
    Init(InitArgs),
}

/// Parse `args`, execute the requested command against `registry`, and report the exit code to
/// `host`.
pub async fn run<H, I, T>(host: &mut H, registry: &Registry, args: I)
where
    H: Host,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                let _ = write!(host.error(), "{e}");
                EXIT_USAGE
            } else {
                let _ = write!(host.output(), "{e}");
                EXIT_OK
            };
            host.exit(code);
            return;
        }
    };

    let result = match &cli.command {
        Command::List(args) => list::list_checks(host, registry, args),
        Command::Run(args) => run_checks::run_checks(host, registry, args).await,
        Command::Init(args) => init::init_config(host, args),
    };

    match result {
        Ok(code) => host.exit(code),
        Err(e) => {
            let _ = writeln!(host.error(), "error: {e:#}");
            host.exit(EXIT_USAGE);
        }
    }
}
