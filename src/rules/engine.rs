//! Rule engine
//!
//! Runs every rule in catalog order and concatenates their violations.
//!
//! - Rules are independent; a skipped rule never stops the others
//! - Violation order is rule order, then each rule's own order
//! - Evaluation is deterministic and side-effect free

use serde::Serialize;

use super::catalog::RuleId;
use super::config::RuleConfig;
use super::coverage::{DoseMonotonicCoverage, PlateBalance, ReplicateMinimum};
use super::integrity::{MetadataPresence, ProvenanceAgreement};
use super::rule::{Rule, RuleContext};
use super::structural::{
    CompoundDosePositive, ControlPresence, PositionInBounds, UniquePosition, VehicleDoseZero,
};
use super::violation::Violation;
use crate::design::{DesignMetadata, Well};
use crate::provenance::{ProvenanceBlock, ProvenanceVerifier};

/// A rule that could not evaluate during one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRule {
    pub rule: RuleId,
    pub reason: String,
}

/// Full engine output: violations plus rules that were skipped.
///
/// Skips are diagnostic only and never part of a certificate.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EvaluationReport {
    pub violations: Vec<Violation>,
    pub skipped: Vec<SkippedRule>,
}

fn rule_for(id: RuleId) -> Box<dyn Rule> {
    match id {
        RuleId::UniquePosition => Box::new(UniquePosition),
        RuleId::VehicleDoseZero => Box::new(VehicleDoseZero),
        RuleId::CompoundDosePositive => Box::new(CompoundDosePositive),
        RuleId::ControlPresence => Box::new(ControlPresence),
        RuleId::DoseMonotonicCoverage => Box::new(DoseMonotonicCoverage),
        RuleId::ReplicateMinimum => Box::new(ReplicateMinimum),
        RuleId::PlateBalance => Box::new(PlateBalance),
        RuleId::ProvenanceAgreement => Box::new(ProvenanceAgreement),
        RuleId::PositionInBounds => Box::new(PositionInBounds),
        RuleId::MetadataPresence => Box::new(MetadataPresence),
    }
}

/// Evaluates the fixed rule set against a well set
pub struct RuleEngine {
    config: RuleConfig,
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Create an engine with the standard rules in catalog order
    pub fn new(config: RuleConfig) -> Self {
        Self {
            config,
            rules: RuleId::ALL.iter().copied().map(rule_for).collect(),
        }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Rule identifiers in evaluation order
    pub fn rule_order(&self) -> Vec<RuleId> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Evaluate all rules and return the ordered violations
    pub fn evaluate(&self, wells: &[Well], metadata: Option<&DesignMetadata>) -> Vec<Violation> {
        let provenance = ProvenanceVerifier::verify(wells, metadata);
        self.evaluate_with_provenance(wells, metadata, &provenance)
            .violations
    }

    /// Evaluate all rules against an already computed provenance block
    pub fn evaluate_with_provenance(
        &self,
        wells: &[Well],
        metadata: Option<&DesignMetadata>,
        provenance: &ProvenanceBlock,
    ) -> EvaluationReport {
        let ctx = RuleContext {
            wells,
            metadata,
            provenance,
            config: &self.config,
        };

        let mut report = EvaluationReport::default();
        for rule in &self.rules {
            let id = rule.id();
            match rule.check(&ctx) {
                Ok(mut violations) => {
                    violations.retain(|v| v.rule == id);
                    report.violations.extend(violations);
                }
                Err(skip) => report.skipped.push(SkippedRule {
                    rule: id,
                    reason: skip.reason,
                }),
            }
        }
        report
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}
