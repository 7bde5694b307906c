//! Coverage rules
//!
//! Checks that a design carries enough dose range, replication and plate
//! balance to be analysable. Sentinel wells are excluded from dose and
//! replicate coverage; plate balance counts every well.

use serde_json::json;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::catalog::RuleId;
use super::rule::{Rule, RuleContext, RuleResult, RuleSkip};
use super::violation::Violation;
use crate::design::Well;

fn potency_wells<'a>(wells: &'a [Well]) -> impl Iterator<Item = &'a Well> {
    wells.iter().filter(|w| !w.is_sentinel)
}

/// Sorted distinct values, comparing by total order
fn distinct_sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
    values
}

/// Per compound, doses span enough decades or count. One violation per
/// compound that falls short.
pub struct DoseMonotonicCoverage;

impl Rule for DoseMonotonicCoverage {
    fn id(&self) -> RuleId {
        RuleId::DoseMonotonicCoverage
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        // Non-positive doses belong to compound-dose-positive.
        let mut by_compound: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for well in potency_wells(ctx.wells) {
            if let Some(name) = well.compound.name() {
                if well.dose > 0.0 {
                    by_compound.entry(name).or_default().push(well.dose);
                }
            }
        }

        if by_compound.is_empty() {
            return Err(RuleSkip::new("no compound wells with a positive dose"));
        }

        let min_span = ctx.config.min_dose_span_decades;
        let min_count = ctx.config.min_distinct_doses;

        let violations = by_compound
            .into_iter()
            .filter_map(|(compound, doses)| {
                let doses = distinct_sorted(doses);
                let (first, last) = (*doses.first()?, *doses.last()?);
                let span = (last / first).log10();
                if span >= min_span || doses.len() >= min_count {
                    return None;
                }
                Some(
                    Violation::new(
                        self.id(),
                        format!(
                            "compound {} has {} distinct doses spanning {:.2} decades; \
                             need {} decades or {} doses",
                            compound,
                            doses.len(),
                            span,
                            min_span,
                            min_count
                        ),
                    )
                    .with_suggestion("Widen the dilution series or add intermediate doses")
                    .with_details(json!({
                        "compound": compound,
                        "distinctDoses": doses,
                        "spanDecades": span,
                    })),
                )
            })
            .collect();

        Ok(violations)
    }
}

/// Each condition has enough non-sentinel replicates. One aggregate
/// violation listing every short condition.
pub struct ReplicateMinimum;

struct Condition<'a> {
    compound: &'a str,
    dose: f64,
    cell_line: &'a str,
    timepoint: f64,
    count: usize,
}

impl Rule for ReplicateMinimum {
    fn id(&self) -> RuleId {
        RuleId::ReplicateMinimum
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let mut groups: BTreeMap<(&str, u64, &str, u64), Condition<'_>> = BTreeMap::new();
        for well in potency_wells(ctx.wells) {
            let key = (
                well.compound.as_str(),
                positive_zero(well.dose).to_bits(),
                well.cell_line.as_str(),
                positive_zero(well.timepoint).to_bits(),
            );
            groups
                .entry(key)
                .or_insert_with(|| Condition {
                    compound: well.compound.as_str(),
                    dose: positive_zero(well.dose),
                    cell_line: &well.cell_line,
                    timepoint: positive_zero(well.timepoint),
                    count: 0,
                })
                .count += 1;
        }

        if groups.is_empty() {
            return Err(RuleSkip::new("no non-sentinel wells"));
        }

        let minimum = ctx.config.min_replicates;
        let mut short: Vec<Condition<'_>> = groups
            .into_values()
            .filter(|c| c.count < minimum)
            .collect();

        if short.is_empty() {
            return Ok(Vec::new());
        }

        short.sort_by(|a, b| {
            a.compound
                .cmp(b.compound)
                .then(a.dose.total_cmp(&b.dose))
                .then(a.cell_line.cmp(b.cell_line))
                .then(a.timepoint.total_cmp(&b.timepoint))
        });

        let groups: Vec<_> = short
            .iter()
            .map(|c| {
                json!({
                    "compound": c.compound,
                    "dose": c.dose,
                    "cellLine": c.cell_line,
                    "timepoint": c.timepoint,
                    "count": c.count,
                })
            })
            .collect();

        Ok(vec![Violation::new(
            self.id(),
            format!(
                "{} condition(s) have fewer than {} non-sentinel replicates",
                short.len(),
                minimum
            ),
        )
        .with_suggestion("Add replicate wells for the listed conditions")
        .with_details(json!({ "minimum": minimum, "groups": groups }))])
    }
}

fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Per-plate well counts stay within tolerance of the mean. One aggregate
/// violation listing every plate outside it.
pub struct PlateBalance;

impl Rule for PlateBalance {
    fn id(&self) -> RuleId {
        RuleId::PlateBalance
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for well in ctx.wells {
            *counts.entry(well.plate.as_str()).or_default() += 1;
        }

        if counts.len() < 2 {
            return Ok(Vec::new());
        }

        let mean = ctx.wells.len() as f64 / counts.len() as f64;
        let tolerance = ctx.config.plate_balance_tolerance;

        let outliers: Vec<_> = counts
            .iter()
            .filter_map(|(plate, &wells)| {
                let deviation = (wells as f64 - mean) / mean;
                (deviation.abs() > tolerance).then(|| {
                    json!({ "plate": plate, "wells": wells, "deviation": deviation })
                })
            })
            .collect();

        if outliers.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![Violation::new(
            self.id(),
            format!(
                "{} plate(s) deviate from the mean of {:.1} wells by more than {:.0}%",
                outliers.len(),
                mean,
                tolerance * 100.0
            ),
        )
        .with_suggestion("Redistribute wells so plates carry similar loads")
        .with_details(json!({
            "mean": mean,
            "tolerance": tolerance,
            "plates": outliers,
        }))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::config::RuleConfig;
    use crate::rules::testing::run;

    fn series(compound: &str, doses: &[f64]) -> Vec<Well> {
        doses
            .iter()
            .enumerate()
            .map(|(i, &dose)| Well::treated("P1", 1, i as u16 + 1, compound, dose, "HeLa", 24.0))
            .collect()
    }

    #[test]
    fn test_dose_span_satisfies_coverage() {
        let wells = series("CMP-1", &[0.01, 0.1, 1.0, 10.0, 100.0]);
        assert!(run(&DoseMonotonicCoverage, &wells, None, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_dose_count_satisfies_coverage() {
        let wells = series("CMP-1", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(run(&DoseMonotonicCoverage, &wells, None, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_dose_span_at_threshold_passes() {
        // exactly 3 decades, two distinct doses
        let wells = series("CMP-1", &[0.01, 10.0]);
        assert!(run(&DoseMonotonicCoverage, &wells, None, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_narrow_series_flagged_per_compound() {
        let mut wells = series("CMP-1", &[1.0, 2.0, 2.0, 4.0]);
        wells.extend(series("CMP-2", &[0.001, 10.0]));
        let violations =
            run(&DoseMonotonicCoverage, &wells, None, &RuleConfig::default()).unwrap();

        assert_eq!(violations.len(), 1);
        let details = violations[0].details.as_ref().unwrap();
        assert_eq!(details["compound"], "CMP-1");
        assert_eq!(details["distinctDoses"], json!([1.0, 2.0, 4.0]));
    }

    #[test]
    fn test_sentinels_ignored_for_dose_coverage() {
        let mut wells = series("CMP-1", &[1.0]);
        wells.push(Well::treated("P1", 2, 1, "CMP-1", 10_000.0, "HeLa", 24.0).as_sentinel());
        let violations =
            run(&DoseMonotonicCoverage, &wells, None, &RuleConfig::default()).unwrap();
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_dose_coverage_skips_without_compounds() {
        let wells = vec![Well::vehicle("P1", 1, 1, "HeLa", 24.0)];
        assert!(run(&DoseMonotonicCoverage, &wells, None, &RuleConfig::default()).is_err());
    }

    #[test]
    fn test_replicate_minimum_aggregates() {
        let wells = vec![
            Well::vehicle("P1", 1, 1, "HeLa", 24.0),
            Well::vehicle("P1", 1, 2, "HeLa", 24.0),
            Well::treated("P1", 1, 3, "CMP-1", 1.0, "HeLa", 24.0),
            Well::treated("P1", 1, 4, "CMP-1", 1.0, "HeLa", 24.0).as_sentinel(),
            Well::treated("P1", 1, 5, "CMP-1", 2.0, "HeLa", 48.0),
        ];
        let violations = run(&ReplicateMinimum, &wells, None, &RuleConfig::default()).unwrap();

        assert_eq!(violations.len(), 1);
        let groups = &violations[0].details.as_ref().unwrap()["groups"];
        assert_eq!(groups.as_array().unwrap().len(), 2);
        assert_eq!(groups[0]["dose"], 1.0);
        assert_eq!(groups[0]["count"], 1);
        assert_eq!(groups[1]["timepoint"], 48.0);
    }

    #[test]
    fn test_replicate_minimum_satisfied() {
        let wells = vec![
            Well::treated("P1", 1, 1, "CMP-1", 1.0, "HeLa", 24.0),
            Well::treated("P1", 1, 2, "CMP-1", 1.0, "HeLa", 24.0),
        ];
        assert!(run(&ReplicateMinimum, &wells, None, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_plate_balance() {
        let mut wells: Vec<Well> = (1..=10)
            .map(|c| Well::vehicle("P1", 1, c, "HeLa", 24.0))
            .collect();
        wells.extend((1..=4).map(|c| Well::vehicle("P2", 1, c, "HeLa", 24.0)));
        let violations = run(&PlateBalance, &wells, None, &RuleConfig::default()).unwrap();

        assert_eq!(violations.len(), 1);
        let details = violations[0].details.as_ref().unwrap();
        assert_eq!(details["mean"], 7.0);
        assert_eq!(details["plates"].as_array().unwrap().len(), 2);
    }

    fn plates(p1: u16, p2: u16) -> Vec<Well> {
        let mut wells: Vec<Well> = (1..=p1)
            .map(|c| Well::vehicle("P1", 1, c, "HeLa", 24.0))
            .collect();
        wells.extend((1..=p2).map(|c| Well::vehicle("P2", 1, c, "HeLa", 24.0)));
        wells
    }

    #[test]
    fn test_plate_balance_at_tolerance_passes() {
        // mean 4, deviation exactly 0.25
        let wells = plates(5, 3);
        assert!(run(&PlateBalance, &wells, None, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_plate_balance_beyond_tolerance_fires() {
        // mean 4, deviation 0.5
        let wells = plates(6, 2);
        let violations = run(&PlateBalance, &wells, None, &RuleConfig::default()).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].details.as_ref().unwrap()["plates"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_single_plate_is_balanced() {
        let wells = vec![Well::vehicle("P1", 1, 1, "HeLa", 24.0)];
        assert!(run(&PlateBalance, &wells, None, &RuleConfig::default())
            .unwrap()
            .is_empty());
    }
}
