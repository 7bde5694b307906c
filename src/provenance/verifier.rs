//! Three-way provenance verification
//!
//! Compares the author's expected scaffold hash, the hash observed at
//! materialization, and the hash recomputed from the wells under test.
//! Disagreement is returned as data, never as an error.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::canonical::{hashes_equal, well_set_hash};
use crate::design::{DesignMetadata, Well};

/// A hash that may or may not have been recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum HashSlot {
    /// Not recorded (e.g. design not yet materialized)
    Absent,
    /// Recorded value, as supplied
    Present(String),
}

impl HashSlot {
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some(v) => HashSlot::Present(v.to_string()),
            None => HashSlot::Absent,
        }
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            HashSlot::Absent => None,
            HashSlot::Present(v) => Some(v),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, HashSlot::Present(_))
    }
}

/// Which of the three hashes is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashSource {
    Expected,
    Observed,
    WellDerived,
}

impl HashSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashSource::Expected => "expected",
            HashSource::Observed => "observed",
            HashSource::WellDerived => "well-derived",
        }
    }
}

impl fmt::Display for HashSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of comparing one pair of hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairAgreement {
    Agree,
    Disagree,
    /// At least one side is absent
    NotComparable,
}

impl PairAgreement {
    fn compare(left: Option<&str>, right: Option<&str>) -> Self {
        match (left, right) {
            (Some(l), Some(r)) if hashes_equal(l, r) => PairAgreement::Agree,
            (Some(_), Some(_)) => PairAgreement::Disagree,
            _ => PairAgreement::NotComparable,
        }
    }
}

/// One disagreeing pair of present hashes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashMismatch {
    pub left: HashSource,
    pub right: HashSource,
    pub left_hash: String,
    pub right_hash: String,
}

/// Pairwise comparison of the three hashes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceAgreement {
    pub expected_vs_observed: PairAgreement,
    pub expected_vs_derived: PairAgreement,
    pub observed_vs_derived: PairAgreement,
    mismatches: Vec<HashMismatch>,
}

impl ProvenanceAgreement {
    /// True when no present pair disagrees
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Disagreeing pairs, in fixed pair order
    pub fn mismatches(&self) -> &[HashMismatch] {
        &self.mismatches
    }
}

/// Hashes found in the environment and recomputed from the wells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedProvenance {
    pub scaffold_hash: HashSlot,
    pub well_derived_hash: String,
    /// `None` when no metadata was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub well_derived_matches_expected: Option<bool>,
}

/// Provenance block embedded in the certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaffold_id: Option<String>,
    pub expected: HashSlot,
    pub observed: ObservedProvenance,
}

impl ProvenanceBlock {
    /// True when no metadata contributed to this block
    pub fn is_derived_only(&self) -> bool {
        self.scaffold_id.is_none()
            && !self.expected.is_present()
            && !self.observed.scaffold_hash.is_present()
            && self.observed.well_derived_matches_expected.is_none()
    }

    /// Compare every pair of hashes
    pub fn agreement(&self) -> ProvenanceAgreement {
        let expected = self.expected.as_option();
        let observed = self.observed.scaffold_hash.as_option();
        let derived = Some(self.observed.well_derived_hash.as_str());

        let pairs = [
            (HashSource::Expected, expected, HashSource::Observed, observed),
            (HashSource::Expected, expected, HashSource::WellDerived, derived),
            (HashSource::Observed, observed, HashSource::WellDerived, derived),
        ];

        let mut outcomes = [PairAgreement::NotComparable; 3];
        let mut mismatches = Vec::new();
        for (i, (left, lhash, right, rhash)) in pairs.iter().enumerate() {
            outcomes[i] = PairAgreement::compare(*lhash, *rhash);
            if let (PairAgreement::Disagree, Some(l), Some(r)) = (outcomes[i], lhash, rhash) {
                mismatches.push(HashMismatch {
                    left: *left,
                    right: *right,
                    left_hash: l.to_string(),
                    right_hash: r.to_string(),
                });
            }
        }

        ProvenanceAgreement {
            expected_vs_observed: outcomes[0],
            expected_vs_derived: outcomes[1],
            observed_vs_derived: outcomes[2],
            mismatches,
        }
    }
}

/// Computes provenance blocks. Pure; holds no state.
pub struct ProvenanceVerifier;

impl ProvenanceVerifier {
    /// Builds the provenance block for a well set.
    ///
    /// Without metadata only the well-derived hash is populated.
    pub fn verify(wells: &[Well], metadata: Option<&DesignMetadata>) -> ProvenanceBlock {
        let well_derived_hash = well_set_hash(wells);

        match metadata {
            None => ProvenanceBlock {
                scaffold_id: None,
                expected: HashSlot::Absent,
                observed: ObservedProvenance {
                    scaffold_hash: HashSlot::Absent,
                    well_derived_hash,
                    well_derived_matches_expected: None,
                },
            },
            Some(meta) => {
                let matches = hashes_equal(&well_derived_hash, &meta.expected.scaffold_hash);
                ProvenanceBlock {
                    scaffold_id: Some(meta.scaffold_id.clone()),
                    expected: HashSlot::Present(meta.expected.scaffold_hash.clone()),
                    observed: ObservedProvenance {
                        scaffold_hash: HashSlot::from_option(meta.observed_scaffold_hash()),
                        well_derived_hash,
                        well_derived_matches_expected: Some(matches),
                    },
                }
            }
        }
    }
}
