//! Violation records

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::catalog::RuleId;

/// Severity of a violation. Only errors affect pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    Warning,
    Error,
}

impl ViolationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationSeverity::Warning => "warning",
            ViolationSeverity::Error => "error",
        }
    }
}

impl fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One detected invariant breach.
///
/// The severity is taken from the producing rule, so a violation's type
/// and severity can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub rule: RuleId,
    pub severity: ViolationSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Violation {
    /// Create a violation for the given rule
    pub fn new(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach a remediation hint
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach structured evidence
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == ViolationSeverity::Error
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_follows_rule() {
        assert!(Violation::new(RuleId::UniquePosition, "dup").is_error());
        assert!(!Violation::new(RuleId::ControlPresence, "none").is_error());
    }

    #[test]
    fn test_wire_format() {
        let v = Violation::new(RuleId::ControlPresence, "plate P2 has no vehicle well")
            .with_details(json!({"plate": "P2"}));
        let encoded = serde_json::to_value(&v).unwrap();
        assert_eq!(encoded["type"], "control-presence");
        assert_eq!(encoded["severity"], "warning");
        assert_eq!(encoded["details"]["plate"], "P2");
        assert!(encoded.get("suggestion").is_none());
    }

    #[test]
    fn test_display() {
        let v = Violation::new(RuleId::VehicleDoseZero, "dose 1");
        assert_eq!(v.to_string(), "[error] vehicle-dose-zero: dose 1");
    }
}
