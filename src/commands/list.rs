use super::common::{EXIT_OK, SelectionArgs};
use super::host::Host;
use crate::Result;
use crate::checks::Registry;
use crate::reports::{ColorMode, ReportFormat, generate_console_catalog, generate_json_catalog};
use clap::Args;
use std::io::IsTerminal;

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// When to color console output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

pub fn list_checks<H: Host>(host: &mut H, registry: &Registry, args: &ListArgs) -> Result<i32> {
    let selected = registry.select(&args.selection.to_selection());

    match args.format {
        ReportFormat::Console => {
            let use_colors = args.color.use_colors(std::io::stdout().is_terminal());
            generate_console_catalog(selected.descriptors(), use_colors, &mut host.output())?;
        }
        ReportFormat::Json => generate_json_catalog(selected.descriptors(), &mut host.output())?,
    }

    Ok(EXIT_OK)
}
