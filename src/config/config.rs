use crate::Result;
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// Log target for configuration loading
const LOG_TARGET: &str = "config";

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "posture.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Maximum number of checks running at once, 0 for unbounded
    #[serde(default)]
    pub concurrency: u32,

    /// Overall time budget for a run
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Duration>,

    /// Time a check may keep running past the deadline before it is aborted
    #[serde(default = "default_cancel_grace", with = "humantime_serde")]
    pub cancel_grace: Duration,

    /// Scope handed to checks when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

const fn default_cancel_grace() -> Duration {
    Duration::from_secs(10)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicit path must exist. Without one, `posture.toml` in `dir` is used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its values fail [`Self::validate`]
    pub fn load(dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).with_context(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: LOG_TARGET, "No configuration file at '{path}', using defaults");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).with_context(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).with_context(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate().with_context(|| format!("validating configuration file '{final_path}'"))?;

        log::debug!(target: LOG_TARGET, "Loaded configuration from '{final_path}'");
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).with_context(|| format!("writing default configuration to '{output_path}'"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a deadline is set with a zero grace period, if the deadline is zero,
    /// or if the scope is blank
    pub fn validate(&self) -> Result<()> {
        if self.deadline.is_some() && self.cancel_grace.is_zero() {
            bail!("cancel_grace must be greater than zero when a deadline is set");
        }

        if self.deadline.is_some_and(|d| d.is_zero()) {
            bail!("deadline must be greater than zero");
        }

        if self.scope.as_deref().is_some_and(|s| s.trim().is_empty()) {
            bail!("scope must not be empty; remove it to use each provider's default");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
