//! Canonical well-set hashing
//!
//! Canonical form:
//! - Wells sorted by `(plate, row, column)`, ties broken by record bytes
//! - One compact JSON array per well, fields in the fixed order
//!   `plate, row, column, compound, dose, cell_line, timepoint, is_sentinel`
//! - Measurements excluded
//! - Records joined with `\n` after the domain tag
//!
//! The digest is SHA-256, rendered as lowercase hex.

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::design::Well;

/// Domain separation tag, bumped whenever the canonical form changes
pub const HASH_DOMAIN_TAG: &str = "platecert/wells/v1\n";

/// Optional algorithm prefix accepted on supplied hashes
const HASH_PREFIX: &str = "sha256:";

/// Canonical record for a single well
pub fn canonical_record(well: &Well) -> String {
    json!([
        well.plate,
        well.row,
        well.column,
        well.compound.as_str(),
        positive_zero(well.dose),
        well.cell_line,
        positive_zero(well.timepoint),
        well.is_sentinel,
    ])
    .to_string()
}

fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Canonical records of a well set, in canonical order
pub fn canonical_records(wells: &[Well]) -> Vec<String> {
    let mut keyed: Vec<(&Well, String)> = wells
        .iter()
        .map(|well| (well, canonical_record(well)))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp_position(b.0).then_with(|| a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Content hash of a well set, independent of input order.
///
/// Upstream collaborators stamping scaffold hashes must use this function
/// for their hashes to be comparable with the well-derived hash.
pub fn well_set_hash(wells: &[Well]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(HASH_DOMAIN_TAG.as_bytes());
    for record in canonical_records(wells) {
        hasher.update(record.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Comparison form of a supplied hash: trimmed, unprefixed, lowercase
pub fn normalize_hash(hash: &str) -> String {
    let trimmed = hash.trim();
    let unprefixed = match trimmed.get(..HASH_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(HASH_PREFIX) => &trimmed[HASH_PREFIX.len()..],
        _ => trimmed,
    };
    unprefixed.to_ascii_lowercase()
}

/// Compares two hashes in normalized form
pub fn hashes_equal(left: &str, right: &str) -> bool {
    normalize_hash(left) == normalize_hash(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate() -> Vec<Well> {
        vec![
            Well::vehicle("P1", 1, 1, "HeLa", 24.0),
            Well::treated("P1", 1, 2, "CMP-1", 0.1, "HeLa", 24.0),
            Well::treated("P2", 2, 1, "CMP-1", 10.0, "HeLa", 24.0),
        ]
    }

    #[test]
    fn test_record_field_order() {
        let well = Well::treated("P1", 2, 3, "CMP-1", 0.5, "HeLa", 48.0).as_sentinel();
        assert_eq!(
            canonical_record(&well),
            r#"["P1",2,3,"CMP-1",0.5,"HeLa",48.0,true]"#
        );
    }

    #[test]
    fn test_negative_zero_normalized() {
        let mut a = Well::vehicle("P1", 1, 1, "HeLa", 24.0);
        let b = a.clone();
        a.dose = -0.0;
        assert_eq!(canonical_record(&a), canonical_record(&b));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = well_set_hash(&plate());
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_ignores_input_order() {
        let wells = plate();
        let mut reversed = wells.clone();
        reversed.reverse();
        assert_eq!(well_set_hash(&wells), well_set_hash(&reversed));
    }

    #[test]
    fn test_hash_ignores_measurements() {
        let wells = plate();
        let mut measured = wells.clone();
        measured[0] = measured[0].clone().with_measurement("viability", 0.9);
        assert_eq!(well_set_hash(&wells), well_set_hash(&measured));
    }

    #[test]
    fn test_hash_sensitive_to_assignment() {
        let wells = plate();
        let mut changed = wells.clone();
        changed[1].dose = 0.2;
        assert_ne!(well_set_hash(&wells), well_set_hash(&changed));
    }

    #[test]
    fn test_duplicate_positions_order_stable() {
        let a = Well::treated("P1", 1, 1, "CMP-1", 1.0, "HeLa", 24.0);
        let b = Well::treated("P1", 1, 1, "CMP-2", 1.0, "HeLa", 24.0);
        assert_eq!(
            well_set_hash(&[a.clone(), b.clone()]),
            well_set_hash(&[b, a])
        );
    }

    #[test]
    fn test_empty_set_has_stable_hash() {
        assert_eq!(well_set_hash(&[]), well_set_hash(&[]));
    }

    #[test]
    fn test_normalize_hash() {
        assert_eq!(normalize_hash("  SHA256:ABCdef "), "abcdef");
        assert_eq!(normalize_hash("abc"), "abc");
        assert!(hashes_equal("sha256:AA", "aa"));
        assert!(!hashes_equal("aa", "ab"));
    }
}
