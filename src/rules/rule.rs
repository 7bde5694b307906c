//! Rule trait and evaluation context

use std::fmt;

use super::catalog::RuleId;
use super::config::RuleConfig;
use super::violation::Violation;
use crate::design::{DesignMetadata, Well};
use crate::provenance::ProvenanceBlock;

/// Everything a rule may look at. Read-only.
pub struct RuleContext<'a> {
    pub wells: &'a [Well],
    pub metadata: Option<&'a DesignMetadata>,
    pub provenance: &'a ProvenanceBlock,
    pub config: &'a RuleConfig,
}

/// A rule could not evaluate; it produces no violations for this call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSkip {
    pub reason: String,
}

impl RuleSkip {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RuleSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// Outcome of one rule
pub type RuleResult = Result<Vec<Violation>, RuleSkip>;

/// A pure, total check over a well set.
///
/// Implementations emit only violations of their own [`RuleId`].
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult;
}
