//! The check contract and the building blocks checks are written with.

mod cancellation;
mod check;
mod check_descriptor;
mod registry;
mod report_builder;
mod scope;
mod severity;

pub use cancellation::{Cancellation, CancellationSource};
pub use check::{Check, CheckContext, FnCheck};
pub use check_descriptor::{CheckDescriptor, Control};
pub use registry::{Registry, Selection};
pub use report_builder::{MissingField, ReportBuilder, guard, require};
pub use scope::Provider;
pub use severity::Severity;
