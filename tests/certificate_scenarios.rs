//! Certificate Scenario Tests
//!
//! End-to-end certificates for representative designs:
//! - Single plate without metadata
//! - Two balanced plates with agreeing provenance
//! - A plate missing its vehicle controls
//! - Expected and observed scaffold hashes disagreeing
//!
//! Plus the determinism and pass/fail contracts of the builder.

use platecert::certificate::{build, CertificateBuilder};
use platecert::design::{DesignMetadata, Well};
use platecert::provenance::well_set_hash;
use platecert::rules::{RuleConfig, RuleId, ViolationSeverity};

// =============================================================================
// Helper Functions
// =============================================================================

const DOSES: [f64; 5] = [0.01, 0.1, 1.0, 10.0, 100.0];

/// 48 wells: 8 vehicle controls plus two compounds at five doses, four
/// replicates each, laid out row-major on a 12-column plate.
fn balanced_plate(plate: &str) -> Vec<Well> {
    let mut wells = Vec::new();
    let mut slot: u16 = 0;
    let mut next = || {
        let position = (slot / 12 + 1, slot % 12 + 1);
        slot += 1;
        position
    };

    for _ in 0..8 {
        let (row, column) = next();
        wells.push(Well::vehicle(plate, row, column, "HeLa", 24.0));
    }
    for compound in ["CMP-A", "CMP-B"] {
        for dose in DOSES {
            for _ in 0..4 {
                let (row, column) = next();
                wells.push(Well::treated(plate, row, column, compound, dose, "HeLa", 24.0));
            }
        }
    }
    wells
}

fn scenario_b_wells() -> Vec<Well> {
    let mut wells = balanced_plate("P1");
    wells.extend(balanced_plate("P2"));
    wells
}

fn matching_metadata(wells: &[Well]) -> DesignMetadata {
    let hash = well_set_hash(wells);
    DesignMetadata::new("scaffold-7", hash.clone()).with_observed(hash)
}

fn errors(cert: &platecert::DesignCertificate) -> usize {
    cert.violations()
        .iter()
        .filter(|v| v.severity == ViolationSeverity::Error)
        .count()
}

// =============================================================================
// Scenario A: one plate, no metadata
// =============================================================================

fn scenario_a_wells() -> Vec<Well> {
    let mut wells = vec![
        Well::vehicle("P1", 1, 1, "HeLa", 24.0),
        Well::vehicle("P1", 1, 2, "HeLa", 24.0),
    ];
    for (i, dose) in [0.01, 0.01, 1.0, 1.0, 100.0, 100.0].into_iter().enumerate() {
        wells.push(Well::treated("P1", 2, i as u16 + 1, "CMP-A", dose, "HeLa", 24.0));
    }
    wells
}

/// Stats are derived and only the well-derived hash is populated.
#[test]
fn test_scenario_a_stats_and_bare_provenance() {
    let wells = scenario_a_wells();
    let cert = build(&wells, None).unwrap();

    assert_eq!(cert.stats().total_wells(), 8);
    assert_eq!(cert.stats().n_plates(), 1);

    let block = cert.scaffold_metadata();
    assert!(block.is_derived_only());
    assert_eq!(block.observed.well_derived_hash, well_set_hash(&wells));

    let value = serde_json::to_value(&cert).unwrap();
    let provenance = &value["scaffoldMetadata"];
    assert!(provenance.get("scaffoldId").is_none());
    assert_eq!(provenance["expected"]["state"], "absent");
    assert_eq!(provenance["observed"]["scaffoldHash"]["state"], "absent");
    assert!(provenance["observed"].get("wellDerivedMatchesExpected").is_none());
}

/// Without metadata, pass/fail comes from the structural rules alone.
#[test]
fn test_scenario_a_passing_follows_structure() {
    let wells = scenario_a_wells();
    assert!(build(&wells, None).unwrap().is_passing());

    let mut broken = wells.clone();
    broken[3].column = broken[2].column;
    broken[3].row = broken[2].row;
    let cert = build(&broken, None).unwrap();
    assert!(!cert.is_passing());
    assert!(cert.violations().iter().all(|v| v.rule != RuleId::ProvenanceAgreement));
}

// =============================================================================
// Scenario B: two balanced plates, agreeing provenance
// =============================================================================

#[test]
fn test_scenario_b_passes_cleanly() {
    let wells = scenario_b_wells();
    assert_eq!(wells.len(), 96);
    let metadata = matching_metadata(&wells);

    let cert = build(&wells, Some(&metadata)).unwrap();

    assert!(cert.is_passing());
    assert_eq!(errors(&cert), 0);
    assert!(cert.violations().is_empty(), "{:?}", cert.violations());
    assert_eq!(cert.stats().n_plates(), 2);
    assert_eq!(
        cert.scaffold_metadata().observed.well_derived_matches_expected,
        Some(true)
    );
}

// =============================================================================
// Scenario C: one plate without vehicle controls
// =============================================================================

#[test]
fn test_scenario_c_single_control_warning() {
    let mut wells = scenario_b_wells();
    let replacement = [0.01, 0.1, 1.0, 10.0];
    let mut k = 0;
    for well in wells.iter_mut().filter(|w| w.plate == "P2" && w.is_vehicle()) {
        *well = Well::treated(
            "P2",
            well.row,
            well.column,
            "CMP-A",
            replacement[k / 2],
            "HeLa",
            24.0,
        );
        k += 1;
    }
    assert_eq!(k, 8);
    let metadata = matching_metadata(&wells);

    let cert = build(&wells, Some(&metadata)).unwrap();

    let control: Vec<_> = cert
        .violations()
        .iter()
        .filter(|v| v.rule == RuleId::ControlPresence)
        .collect();
    assert_eq!(control.len(), 1);
    assert_eq!(control[0].severity, ViolationSeverity::Warning);
    assert_eq!(control[0].details.as_ref().unwrap()["plate"], "P2");
    assert!(cert.is_passing());
}

// =============================================================================
// Scenario D: expected and observed hashes disagree
// =============================================================================

#[test]
fn test_scenario_d_provenance_error() {
    let wells = scenario_b_wells();
    let metadata = DesignMetadata::new("scaffold-7", well_set_hash(&wells))
        .with_observed("0".repeat(64));

    let cert = build(&wells, Some(&metadata)).unwrap();

    let provenance: Vec<_> = cert
        .violations()
        .iter()
        .filter(|v| v.rule == RuleId::ProvenanceAgreement)
        .collect();
    assert_eq!(provenance.len(), 1);
    assert_eq!(provenance[0].severity, ViolationSeverity::Error);
    assert!(!cert.is_passing());
}

// =============================================================================
// Determinism
// =============================================================================

/// Same input, field-for-field and byte-for-byte identical certificate.
#[test]
fn test_build_is_deterministic() {
    let mut wells = scenario_b_wells();
    wells.push(wells[0].clone());
    wells[10].dose = 0.0;
    let metadata = DesignMetadata::new("scaffold-7", "abc").with_observed("def");

    let first = build(&wells, Some(&metadata)).unwrap();
    for _ in 0..20 {
        let again = build(&wells, Some(&metadata)).unwrap();
        assert_eq!(again, first);
        assert_eq!(again.to_json().unwrap(), first.to_json().unwrap());
    }
}

/// The configured builder and the default entry point agree.
#[test]
fn test_default_builder_matches_build() {
    let wells = scenario_a_wells();
    let configured = CertificateBuilder::new(RuleConfig::default())
        .build(&wells, None)
        .unwrap();
    assert_eq!(configured, build(&wells, None).unwrap());
}

// =============================================================================
// Pass/fail semantics
// =============================================================================

/// Adding a well that triggers no rule never changes pass/fail.
#[test]
fn test_adding_benign_well_keeps_status() {
    let mut wells = scenario_b_wells();
    assert!(build(&wells, None).unwrap().is_passing());

    wells.push(Well::vehicle("P1", 5, 1, "HeLa", 24.0));
    assert!(build(&wells, None).unwrap().is_passing());

    let mut failing = scenario_b_wells();
    failing.push(failing[5].clone());
    assert!(!build(&failing, None).unwrap().is_passing());
    failing.push(Well::vehicle("P1", 5, 2, "HeLa", 24.0));
    assert!(!build(&failing, None).unwrap().is_passing());
}

/// Passing is exactly the absence of error-severity violations.
#[test]
fn test_passing_iff_no_errors() {
    let mut designs = vec![scenario_a_wells(), scenario_b_wells()];
    let mut dup = scenario_b_wells();
    dup.push(dup[0].clone());
    designs.push(dup);
    let mut no_control = scenario_a_wells();
    no_control.retain(|w| !w.is_vehicle());
    designs.push(no_control);

    for wells in designs {
        let cert = build(&wells, None).unwrap();
        assert_eq!(cert.is_passing(), errors(&cert) == 0);
        assert_eq!(cert.count_by_severity().errors, errors(&cert));
    }
}
