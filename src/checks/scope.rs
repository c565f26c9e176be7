//! Resolution of the region, project, or subscription a check runs against.

use crate::Result;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};

const DEFAULT_AWS_REGION: &str = "us-east-1";

/// The cloud provider a check talks to, which decides what an omitted scope means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    Aws,
    Gcp,
    Azure,
}

impl Provider {
    /// Environment variables consulted, in order, when no scope is requested.
    #[must_use]
    pub const fn scope_variables(self) -> &'static [&'static str] {
        match self {
            Self::Aws => &["AWS_REGION", "AWS_DEFAULT_REGION"],
            Self::Gcp => &["GCP_PROJECT_ID", "GOOGLE_CLOUD_PROJECT"],
            Self::Azure => &["AZURE_SUBSCRIPTION_ID"],
        }
    }

    /// The scope used when neither a request nor the environment names one.
    #[must_use]
    pub const fn fallback_scope(self) -> Option<&'static str> {
        match self {
            Self::Aws => Some(DEFAULT_AWS_REGION),
            Self::Gcp | Self::Azure => None,
        }
    }

    /// Resolve the scope for a check invocation from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was requested, no environment variable is set, and the
    /// provider has no default scope.
    pub fn resolve_scope(self, requested: Option<&str>) -> Result<Arc<str>> {
        self.resolve_scope_with(requested, |name| std::env::var(name).ok())
    }

    /// Resolve the scope, reading variables through `lookup`.
    ///
    /// A non-empty requested scope wins, then the first non-empty variable from
    /// [`Self::scope_variables`], then [`Self::fallback_scope`].
    ///
    /// # Errors
    ///
    /// Returns an error if none of those yields a scope.
    pub fn resolve_scope_with(self, requested: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Result<Arc<str>> {
        if let Some(scope) = requested.map(str::trim).filter(|s| !s.is_empty()) {
            return Ok(Arc::from(scope));
        }

        for variable in self.scope_variables() {
            if let Some(value) = lookup(variable) {
                let value = value.trim();
                if !value.is_empty() {
                    return Ok(Arc::from(value));
                }
            }
        }

        if let Some(fallback) = self.fallback_scope() {
            return Ok(Arc::from(fallback));
        }

        bail!(
            "no {self} scope was given and none of {} is set",
            self.scope_variables().join(", ")
        );
    }
}
