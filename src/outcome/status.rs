use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The verdict for a single checked resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The rule is satisfied.
    Pass,

    /// The rule is violated by a resource that was actually found.
    Fail,

    /// Compliance could not be determined.
    Error,

    /// The rule does not apply in this scope.
    NotApplicable,
}

impl Status {
    /// Whether an outcome with this status must carry a message.
    #[must_use]
    pub const fn requires_message(self) -> bool {
        matches!(self, Self::Fail | Self::Error)
    }

    /// Whether an outcome with this status may carry a message.
    #[must_use]
    pub const fn allows_message(self) -> bool {
        !matches!(self, Self::Pass)
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Pass => "✔",
            Self::Fail => "✗",
            Self::Error => "!",
            Self::NotApplicable => "-",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(Status::Pass.to_string(), "PASS");
        assert_eq!(Status::Fail.to_string(), "FAIL");
        assert_eq!(Status::Error.to_string(), "ERROR");
        assert_eq!(Status::NotApplicable.to_string(), "NOT_APPLICABLE");
    }

    #[test]
    fn test_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&Status::NotApplicable).unwrap();
        assert_eq!(json, "\"NOT_APPLICABLE\"");
    }

    #[test]
    fn test_message_rules() {
        assert!(!Status::Pass.allows_message());
        assert!(Status::Fail.requires_message());
        assert!(Status::Error.requires_message());
        assert!(!Status::NotApplicable.requires_message());
        assert!(Status::NotApplicable.allows_message());
    }

    #[test]
    fn test_every_status_has_an_icon() {
        for status in Status::iter() {
            assert!(!status.icon().is_empty());
        }
    }
}
