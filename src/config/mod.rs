//! Run configuration loaded from `posture.toml`.

#[expect(clippy::module_inception, reason = "I like it this way")]
mod config;

pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML};
