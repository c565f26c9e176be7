//! Execution and aggregation framework for cloud posture checks.
//!
//! A posture check inspects one kind of cloud resource against a policy rule and
//! reports a verdict per resource. This crate holds everything the checks share:
//!
//! - [`outcome`]: the per-resource verdict and the report a check produces
//! - [`checks`]: the contract every check implements, plus the helpers checks are built from
//! - [`pagination`]: the continuation-token loop every data-gathering step follows
//! - [`engine`]: runs many checks concurrently with per-check isolation
//! - [`aggregate`]: folds reports into a flat result set with summary counts
//! - [`config`], [`progress`], [`reports`], [`commands`]: the driver-facing surface

pub type Result<T, E = anyhow::Error> = core::result::Result<T, E>;

pub mod aggregate;
pub mod checks;
pub mod commands;
pub mod config;
pub mod engine;
pub mod outcome;
pub mod pagination;
pub mod progress;
pub mod reports;

pub use crate::commands::{Host, run};
