//! Runs a registry of checks concurrently, isolating each check from the others.

mod check_failure;
mod check_run;
mod engine_options;
mod runner;

pub use check_failure::CheckFailure;
pub use check_run::{CheckRun, CheckState};
pub use engine_options::EngineOptions;
pub use runner::Engine;
