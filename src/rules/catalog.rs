//! Rule catalog
//!
//! Every rule has a stable identifier, a fixed severity and a position in
//! the evaluation order. The order is part of the output contract: it fixes
//! the order of violations in every certificate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::violation::ViolationSeverity;

/// Stable rule identifiers, declared in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    UniquePosition,
    VehicleDoseZero,
    CompoundDosePositive,
    ControlPresence,
    DoseMonotonicCoverage,
    ReplicateMinimum,
    PlateBalance,
    ProvenanceAgreement,
    PositionInBounds,
    MetadataPresence,
}

impl RuleId {
    /// All rules in evaluation order
    pub const ALL: [RuleId; 10] = [
        RuleId::UniquePosition,
        RuleId::VehicleDoseZero,
        RuleId::CompoundDosePositive,
        RuleId::ControlPresence,
        RuleId::DoseMonotonicCoverage,
        RuleId::ReplicateMinimum,
        RuleId::PlateBalance,
        RuleId::ProvenanceAgreement,
        RuleId::PositionInBounds,
        RuleId::MetadataPresence,
    ];

    /// Returns the wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::UniquePosition => "unique-position",
            RuleId::VehicleDoseZero => "vehicle-dose-zero",
            RuleId::CompoundDosePositive => "compound-dose-positive",
            RuleId::ControlPresence => "control-presence",
            RuleId::DoseMonotonicCoverage => "dose-monotonic-coverage",
            RuleId::ReplicateMinimum => "replicate-minimum",
            RuleId::PlateBalance => "plate-balance",
            RuleId::ProvenanceAgreement => "provenance-agreement",
            RuleId::PositionInBounds => "position-in-bounds",
            RuleId::MetadataPresence => "metadata-presence",
        }
    }

    /// Severity of every violation this rule emits
    pub fn severity(&self) -> ViolationSeverity {
        match self {
            RuleId::UniquePosition
            | RuleId::VehicleDoseZero
            | RuleId::CompoundDosePositive
            | RuleId::ProvenanceAgreement
            | RuleId::PositionInBounds => ViolationSeverity::Error,
            RuleId::ControlPresence
            | RuleId::DoseMonotonicCoverage
            | RuleId::ReplicateMinimum
            | RuleId::PlateBalance
            | RuleId::MetadataPresence => ViolationSeverity::Warning,
        }
    }

    /// Whether the rule emits one violation per offender or one aggregate
    pub fn emission(&self) -> Emission {
        match self {
            RuleId::ReplicateMinimum
            | RuleId::PlateBalance
            | RuleId::ProvenanceAgreement
            | RuleId::MetadataPresence => Emission::Aggregate,
            _ => Emission::PerInstance,
        }
    }

    /// One-line description of what the rule checks
    pub fn description(&self) -> &'static str {
        match self {
            RuleId::UniquePosition => "No two wells share a (plate, row, column) position",
            RuleId::VehicleDoseZero => "Every vehicle well has dose 0",
            RuleId::CompoundDosePositive => "Every compound well has dose > 0",
            RuleId::ControlPresence => "Each plate contains at least one vehicle well",
            RuleId::DoseMonotonicCoverage => {
                "Each compound's distinct doses span enough orders of magnitude or count"
            }
            RuleId::ReplicateMinimum => {
                "Each (compound, dose, cell line, timepoint) has enough non-sentinel replicates"
            }
            RuleId::PlateBalance => "Wells per plate stay within tolerance of the mean",
            RuleId::ProvenanceAgreement => {
                "Expected, observed and well-derived scaffold hashes agree"
            }
            RuleId::PositionInBounds => "Every well lies inside the configured plate format",
            RuleId::MetadataPresence => "Design metadata is supplied when required",
        }
    }

    /// Parse a wire identifier
    pub fn parse(s: &str) -> Option<RuleId> {
        RuleId::ALL.iter().copied().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output shape of a rule, fixed per rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emission {
    PerInstance,
    Aggregate,
}

/// Catalog entry describing one rule
#[derive(Debug, Clone, Serialize)]
pub struct RuleDefinition {
    pub rule_id: RuleId,
    pub order: usize,
    pub severity: ViolationSeverity,
    pub emission: Emission,
    pub description: &'static str,
}

/// The full catalog, in evaluation order
pub fn rule_catalog() -> Vec<RuleDefinition> {
    RuleId::ALL
        .iter()
        .enumerate()
        .map(|(order, rule)| RuleDefinition {
            rule_id: *rule,
            order,
            severity: rule.severity(),
            emission: rule.emission(),
            description: rule.description(),
        })
        .collect()
}
