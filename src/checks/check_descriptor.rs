use super::Severity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A reference from a check to the policy control it enforces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Control {
    /// Rule identifier within the policy document, e.g. `"3.1"`.
    pub id: Arc<str>,

    /// The policy document the rule belongs to, e.g. `"CIS AWS Foundations Benchmark v3.0.0"`.
    pub document: Arc<str>,
}

impl Control {
    #[must_use]
    pub fn new(id: impl AsRef<str>, document: impl AsRef<str>) -> Self {
        Self {
            id: Arc::from(id.as_ref()),
            document: Arc::from(document.as_ref()),
        }
    }
}

/// Static metadata describing a check.
///
/// The framework never interprets these fields; they exist for selection and for labelling
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDescriptor {
    pub title: Arc<str>,
    pub description: Arc<str>,
    pub severity: Severity,
    pub controls: Vec<Control>,
    pub service_name: Arc<str>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_service_name: Option<Arc<str>>,
}

impl CheckDescriptor {
    #[must_use]
    pub fn new(title: impl AsRef<str>, service_name: impl AsRef<str>, severity: Severity) -> Self {
        Self {
            title: Arc::from(title.as_ref()),
            description: Arc::from(""),
            severity,
            controls: Vec::new(),
            service_name: Arc::from(service_name.as_ref()),
            short_service_name: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        self.description = Arc::from(description.as_ref());
        self
    }

    #[must_use]
    pub fn with_control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    #[must_use]
    pub fn with_short_service_name(mut self, short_service_name: impl AsRef<str>) -> Self {
        self.short_service_name = Some(Arc::from(short_service_name.as_ref()));
        self
    }

    /// Whether `service` names this check's service, by full or short name, ignoring case.
    #[must_use]
    pub fn matches_service(&self, service: &str) -> bool {
        self.service_name.eq_ignore_ascii_case(service)
            || self
                .short_service_name
                .as_deref()
                .is_some_and(|short| short.eq_ignore_ascii_case(service))
    }
}
