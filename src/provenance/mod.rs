//! Provenance verification
//!
//! Establishes that the design validated is the design executed by
//! comparing three hashes:
//!
//! 1. `expected`: declared by the author at design time
//! 2. `observed`: stamped by the environment that materialized the design
//! 3. `well-derived`: recomputed from the wells under test
//!
//! # Principles
//!
//! - Pure function of its inputs
//! - Canonical hashing is independent of input order
//! - Mismatch is data, not an error
//! - An absent observed hash is distinct from a mismatched one

mod canonical;
mod verifier;

pub use canonical::{
    canonical_record, canonical_records, hashes_equal, normalize_hash, well_set_hash,
    HASH_DOMAIN_TAG,
};
pub use verifier::{
    HashMismatch, HashSlot, HashSource, ObservedProvenance, PairAgreement, ProvenanceAgreement,
    ProvenanceBlock, ProvenanceVerifier,
};
