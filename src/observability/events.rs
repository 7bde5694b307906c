//! Observable events
//!
//! Events are explicit and typed. Each has a fixed log name and severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Rule configuration loaded
    ConfigLoaded,
    /// Design document parsed and checked
    DesignLoaded,
    /// Design document rejected as malformed input
    DesignRejected,
    /// A rule could not evaluate and was skipped
    RuleSkipped,
    /// Two present scaffold hashes disagree
    ProvenanceMismatch,
    /// Certificate built and passing
    CertificateIssued,
    /// Certificate built and failing
    CertificateFailed,
    /// Well-set hash computed
    HashComputed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DesignLoaded => "DESIGN_LOADED",
            Event::DesignRejected => "DESIGN_REJECTED",
            Event::RuleSkipped => "RULE_SKIPPED",
            Event::ProvenanceMismatch => "PROVENANCE_MISMATCH",
            Event::CertificateIssued => "CERTIFICATE_ISSUED",
            Event::CertificateFailed => "CERTIFICATE_FAILED",
            Event::HashComputed => "HASH_COMPUTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::DesignRejected => Severity::Error,
            Event::ProvenanceMismatch | Event::CertificateFailed => Severity::Warn,
            Event::RuleSkipped => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::CertificateIssued.as_str(), "CERTIFICATE_ISSUED");
        assert_eq!(Event::RuleSkipped.to_string(), "RULE_SKIPPED");
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::DesignRejected.severity(), Severity::Error);
        assert_eq!(Event::ProvenanceMismatch.severity(), Severity::Warn);
        assert_eq!(Event::DesignLoaded.severity(), Severity::Info);
    }
}
