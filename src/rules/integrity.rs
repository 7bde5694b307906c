//! Provenance and metadata rules

use serde_json::json;

use super::catalog::RuleId;
use super::rule::{Rule, RuleContext, RuleResult};
use super::violation::Violation;

/// Present hashes agree pairwise. One aggregate violation listing every
/// disagreeing pair.
pub struct ProvenanceAgreement;

impl Rule for ProvenanceAgreement {
    fn id(&self) -> RuleId {
        RuleId::ProvenanceAgreement
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let agreement = ctx.provenance.agreement();
        if agreement.is_consistent() {
            return Ok(Vec::new());
        }

        let pairs: Vec<String> = agreement
            .mismatches()
            .iter()
            .map(|m| format!("{} vs {}", m.left, m.right))
            .collect();

        Ok(vec![Violation::new(
            self.id(),
            format!("scaffold hashes disagree: {}", pairs.join(", ")),
        )
        .with_suggestion(
            "Re-materialize the design from the declared scaffold or regenerate its metadata",
        )
        .with_details(json!({ "mismatches": agreement.mismatches() }))])
    }
}

/// Metadata is supplied when the configuration requires it
pub struct MetadataPresence;

impl Rule for MetadataPresence {
    fn id(&self) -> RuleId {
        RuleId::MetadataPresence
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        if !ctx.config.require_metadata || ctx.metadata.is_some() {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            self.id(),
            "design metadata is missing; provenance cannot be established",
        )
        .with_suggestion("Supply scaffoldId and expected.scaffoldHash with the design")])
    }
}
