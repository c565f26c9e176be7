use super::{Check, CheckDescriptor, Severity};
use std::sync::Arc;

/// An ordered list of checks, built explicitly by the driver and handed to the engine.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    checks: Vec<Arc<dyn Check>>,
}

impl Registry {
    #[must_use]
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Append a check. Checks run and report in registration order.
    pub fn register(&mut self, check: impl Check + 'static) -> &mut Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Append an already shared check.
    pub fn register_shared(&mut self, check: Arc<dyn Check>) -> &mut Self {
        self.checks.push(check);
        self
    }

    #[must_use]
    pub fn with(mut self, check: impl Check + 'static) -> Self {
        let _ = self.register(check);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Check>> {
        self.checks.iter()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &CheckDescriptor> {
        self.checks.iter().map(|c| c.descriptor())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// The checks matching `selection`, in registration order.
    #[must_use]
    pub fn select(&self, selection: &Selection) -> Self {
        Self {
            checks: self
                .checks
                .iter()
                .filter(|c| selection.matches(c.descriptor()))
                .map(Arc::clone)
                .collect(),
        }
    }
}

/// Criteria for picking checks out of a registry. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Service names (full or short, case-insensitive); a check matches if it names any of them.
    pub services: Vec<String>,

    /// A check matches if its severity is one of these.
    pub severities: Vec<Severity>,

    /// Case-insensitive substring of the check title.
    pub title: Option<String>,
}

impl Selection {
    #[must_use]
    pub fn matches(&self, descriptor: &CheckDescriptor) -> bool {
        let service_ok = self.services.is_empty() || self.services.iter().any(|s| descriptor.matches_service(s));
        let severity_ok = self.severities.is_empty() || self.severities.contains(&descriptor.severity);
        let title_ok = self
            .title
            .as_deref()
            .is_none_or(|t| descriptor.title.to_lowercase().contains(&t.to_lowercase()));

        service_ok && severity_ok && title_ok
    }
}
