use super::common::EXIT_OK;
use super::host::Host;
use crate::Result;
use crate::config::{CONFIG_FILE_NAME, Config};
use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use std::io::Write;

#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Where to write the configuration file
    #[arg(long, short, value_name = "PATH", default_value = CONFIG_FILE_NAME)]
    pub output: Utf8PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<i32> {
    if args.output.exists() && !args.force {
        bail!("'{}' already exists; pass --force to overwrite it", args.output);
    }

    Config::save_default(&args.output)?;
    writeln!(host.output(), "Wrote default configuration to '{}'", args.output)?;
    Ok(EXIT_OK)
}
