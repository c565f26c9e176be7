//! Rendering of check runs and check catalogs.

mod color_mode;
mod console;
mod json;

pub use color_mode::ColorMode;
pub use console::{generate as generate_console, generate_catalog as generate_console_catalog};
pub use json::{generate as generate_json, generate_catalog as generate_json_catalog};

use clap::ValueEnum;

/// Output format for `list` and `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}
