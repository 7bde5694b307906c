//! Design certificate
//!
//! The certificate is immutable once built. Pass/fail and severity counts
//! are derived from the violation list on demand and never stored.

use serde::Serialize;

use super::view::{count_by_severity, SeverityCounts};
use crate::provenance::ProvenanceBlock;
use crate::rules::{Violation, ViolationSeverity};

/// Summary statistics, derived from the well set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateStats {
    total_wells: usize,
    n_plates: usize,
}

impl CertificateStats {
    pub(crate) fn new(total_wells: usize, n_plates: usize) -> Self {
        Self {
            total_wells,
            n_plates,
        }
    }

    pub fn total_wells(&self) -> usize {
        self.total_wells
    }

    pub fn n_plates(&self) -> usize {
        self.n_plates
    }
}

/// Output of one validation call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignCertificate {
    stats: CertificateStats,
    violations: Vec<Violation>,
    scaffold_metadata: ProvenanceBlock,
}

impl DesignCertificate {
    pub(crate) fn new(
        stats: CertificateStats,
        violations: Vec<Violation>,
        scaffold_metadata: ProvenanceBlock,
    ) -> Self {
        Self {
            stats,
            violations,
            scaffold_metadata,
        }
    }

    pub fn stats(&self) -> CertificateStats {
        self.stats
    }

    /// Violations in rule evaluation order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Provenance block
    pub fn scaffold_metadata(&self) -> &ProvenanceBlock {
        &self.scaffold_metadata
    }

    /// True iff no violation has error severity
    pub fn is_passing(&self) -> bool {
        !self
            .violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn count_by_severity(&self) -> SeverityCounts {
        count_by_severity(&self.violations)
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
