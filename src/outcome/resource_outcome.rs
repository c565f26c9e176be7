use super::Status;
use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

/// The verdict for one checked resource.
///
/// Outcomes can only be built through the status-specific constructors, which keeps the
/// message rules intact: `FAIL` and `ERROR` always explain themselves, `PASS` never does.
/// Once built, an outcome cannot be changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawOutcome")]
pub struct ResourceOutcome {
    resource_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    resource_arn: Option<String>,

    status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ResourceOutcome {
    #[must_use]
    pub fn pass(resource_name: impl Into<String>) -> Self {
        Self::build(resource_name.into(), Status::Pass, None)
    }

    #[must_use]
    pub fn fail(resource_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(resource_name.into(), Status::Fail, Some(message.into()))
    }

    #[must_use]
    pub fn error(resource_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(resource_name.into(), Status::Error, Some(message.into()))
    }

    #[must_use]
    pub fn not_applicable(resource_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(resource_name.into(), Status::NotApplicable, Some(message.into()))
    }

    /// Attach the provider-specific identifier (ARN, self link, resource id) of the resource.
    #[must_use]
    pub fn with_arn(mut self, arn: impl Into<String>) -> Self {
        self.resource_arn = Some(arn.into());
        self
    }

    const fn build(resource_name: String, status: Status, message: Option<String>) -> Self {
        Self {
            resource_name,
            resource_arn: None,
            status,
            message,
        }
    }

    #[must_use]
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    #[must_use]
    pub fn resource_arn(&self) -> Option<&str> {
        self.resource_arn.as_deref()
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Display for ResourceOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.status.icon(), self.resource_name)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// Wire form of an outcome, validated before it becomes a [`ResourceOutcome`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawOutcome {
    resource_name: String,
    #[serde(default)]
    resource_arn: Option<String>,
    status: Status,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<RawOutcome> for ResourceOutcome {
    type Error = String;

    fn try_from(raw: RawOutcome) -> Result<Self, Self::Error> {
        if raw.status.requires_message() && raw.message.is_none() {
            return Err(format!("{} outcome for '{}' is missing its message", raw.status, raw.resource_name));
        }

        if !raw.status.allows_message() && raw.message.is_some() {
            return Err(format!("{} outcome for '{}' must not carry a message", raw.status, raw.resource_name));
        }

        Ok(Self {
            resource_name: raw.resource_name,
            resource_arn: raw.resource_arn,
            status: raw.status,
            message: raw.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_has_no_message() {
        let outcome = ResourceOutcome::pass("trail-1");
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(outcome.resource_name(), "trail-1");
        assert_eq!(outcome.message(), None);
        assert_eq!(outcome.resource_arn(), None);
    }

    #[test]
    fn test_fail_and_error_carry_messages() {
        let fail = ResourceOutcome::fail("bucket", "public read access is enabled");
        assert_eq!(fail.status(), Status::Fail);
        assert_eq!(fail.message(), Some("public read access is enabled"));

        let error = ResourceOutcome::error("bucket", "access denied");
        assert_eq!(error.status(), Status::Error);
        assert_eq!(error.message(), Some("access denied"));
    }

    #[test]
    fn test_with_arn() {
        let outcome = ResourceOutcome::pass("trail-1").with_arn("arn:aws:cloudtrail:us-east-1:1:trail/trail-1");
        assert_eq!(outcome.resource_arn(), Some("arn:aws:cloudtrail:us-east-1:1:trail/trail-1"));
    }

    #[test]
    fn test_serializes_with_camel_case_and_omits_absent_fields() {
        let json = serde_json::to_value(ResourceOutcome::pass("vm-1")).unwrap();
        assert_eq!(json, serde_json::json!({ "resourceName": "vm-1", "status": "PASS" }));

        let json = serde_json::to_value(ResourceOutcome::fail("vm-2", "serial port enabled").with_arn("projects/p/vm-2")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "resourceName": "vm-2",
                "resourceArn": "projects/p/vm-2",
                "status": "FAIL",
                "message": "serial port enabled",
            })
        );
    }

    #[test]
    fn test_deserialize_rejects_fail_without_message() {
        let result = serde_json::from_str::<ResourceOutcome>(r#"{ "resourceName": "x", "status": "FAIL" }"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("missing its message"), "got: {err}");
    }

    #[test]
    fn test_deserialize_rejects_pass_with_message() {
        let result = serde_json::from_str::<ResourceOutcome>(r#"{ "resourceName": "x", "status": "PASS", "message": "hi" }"#);
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_deserialize_accepts_valid_outcome() {
        let outcome: ResourceOutcome =
            serde_json::from_str(r#"{ "resourceName": "x", "status": "NOT_APPLICABLE", "message": "none here" }"#).unwrap();
        assert_eq!(outcome, ResourceOutcome::not_applicable("x", "none here"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceOutcome::pass("a").to_string(), "✔ a");
        assert_eq!(ResourceOutcome::fail("b", "bad").to_string(), "✗ b: bad");
    }
}
