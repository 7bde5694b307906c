//! Certificate builder
//!
//! Validates the call's input contract, then runs the provenance verifier
//! and the rule engine and assembles their output.
//!
//! Identical inputs always produce identical certificates: same stats,
//! same hashes, same violations in the same order.

use std::collections::BTreeSet;

use super::certificate::{CertificateStats, DesignCertificate};
use crate::design::{validate_wells, DesignMetadata, DesignResult, Well};
use crate::provenance::ProvenanceVerifier;
use crate::rules::{RuleConfig, RuleEngine, SkippedRule};

/// Builds certificates with a fixed rule configuration
#[derive(Default)]
pub struct CertificateBuilder {
    engine: RuleEngine,
}

impl CertificateBuilder {
    pub fn new(config: RuleConfig) -> Self {
        Self {
            engine: RuleEngine::new(config),
        }
    }

    pub fn config(&self) -> &RuleConfig {
        self.engine.config()
    }

    /// Build the certificate for a well set.
    ///
    /// # Errors
    ///
    /// Returns `DesignError` only for malformed input: a well missing
    /// identity fields, a non-finite number, or incomplete metadata.
    /// Defects of the design are reported as violations.
    pub fn build(
        &self,
        wells: &[Well],
        metadata: Option<&DesignMetadata>,
    ) -> DesignResult<DesignCertificate> {
        self.build_with_report(wells, metadata).map(|(cert, _)| cert)
    }

    /// Build the certificate and also return the rules that were skipped
    pub fn build_with_report(
        &self,
        wells: &[Well],
        metadata: Option<&DesignMetadata>,
    ) -> DesignResult<(DesignCertificate, Vec<SkippedRule>)> {
        validate_wells(wells)?;
        if let Some(meta) = metadata {
            meta.validate()?;
        }

        let stats = compute_stats(wells);
        let provenance = ProvenanceVerifier::verify(wells, metadata);
        let report = self
            .engine
            .evaluate_with_provenance(wells, metadata, &provenance);

        Ok((
            DesignCertificate::new(stats, report.violations, provenance),
            report.skipped,
        ))
    }
}

/// Build a certificate with the default rule configuration
pub fn build(wells: &[Well], metadata: Option<&DesignMetadata>) -> DesignResult<DesignCertificate> {
    CertificateBuilder::default().build(wells, metadata)
}

fn compute_stats(wells: &[Well]) -> CertificateStats {
    let mut plates = BTreeSet::new();
    for well in wells {
        plates.insert(well.plate.as_str());
    }
    CertificateStats::new(wells.len(), plates.len())
}
