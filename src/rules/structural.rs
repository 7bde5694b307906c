//! Structural rules
//!
//! Checks on well identity and assignment consistency. All of these run
//! over the whole well set, sentinel wells included.

use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::catalog::RuleId;
use super::rule::{Rule, RuleContext, RuleResult, RuleSkip};
use super::violation::Violation;
use crate::design::{Well, WellPosition};

/// Evidence block identifying a single well
pub(crate) fn well_details(index: usize, well: &Well) -> Value {
    json!({
        "well": well.display_id(index),
        "plate": well.plate,
        "position": well.position().label(),
        "compound": well.compound.as_str(),
        "dose": well.dose,
    })
}

/// No two wells share a position. One violation per duplicated position.
pub struct UniquePosition;

impl Rule for UniquePosition {
    fn id(&self) -> RuleId {
        RuleId::UniquePosition
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let mut by_position: BTreeMap<WellPosition, Vec<usize>> = BTreeMap::new();
        for (index, well) in ctx.wells.iter().enumerate() {
            by_position.entry(well.position()).or_default().push(index);
        }

        let violations = by_position
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(position, indices)| {
                let ids: Vec<String> = indices
                    .iter()
                    .map(|&i| ctx.wells[i].display_id(i))
                    .collect();
                Violation::new(
                    self.id(),
                    format!("position {} is assigned to {} wells", position, ids.len()),
                )
                .with_suggestion("Keep one assignment per position and relocate the others")
                .with_details(json!({
                    "position": position.to_string(),
                    "wells": ids,
                }))
            })
            .collect();

        Ok(violations)
    }
}

/// Vehicle wells carry dose 0. One violation per offending well.
pub struct VehicleDoseZero;

impl Rule for VehicleDoseZero {
    fn id(&self) -> RuleId {
        RuleId::VehicleDoseZero
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let violations = ctx
            .wells
            .iter()
            .enumerate()
            .filter(|(_, well)| well.is_vehicle() && well.dose != 0.0)
            .map(|(index, well)| {
                Violation::new(
                    self.id(),
                    format!(
                        "vehicle well {} has dose {}; vehicle wells must have dose 0",
                        well.display_id(index),
                        well.dose
                    ),
                )
                .with_suggestion("Set the dose to 0 or assign a compound to this well")
                .with_details(well_details(index, well))
            })
            .collect();

        Ok(violations)
    }
}

/// Compound wells carry a positive dose. One violation per offending well.
pub struct CompoundDosePositive;

impl Rule for CompoundDosePositive {
    fn id(&self) -> RuleId {
        RuleId::CompoundDosePositive
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let violations = ctx
            .wells
            .iter()
            .enumerate()
            .filter(|(_, well)| !well.is_vehicle() && well.dose <= 0.0)
            .map(|(index, well)| {
                Violation::new(
                    self.id(),
                    format!(
                        "compound well {} ({}) has dose {}; compound wells must have dose > 0",
                        well.display_id(index),
                        well.compound,
                        well.dose
                    ),
                )
                .with_suggestion("Assign a positive dose or mark the well as vehicle")
                .with_details(well_details(index, well))
            })
            .collect();

        Ok(violations)
    }
}

/// Every plate has a vehicle control. One violation per plate without one.
pub struct ControlPresence;

impl Rule for ControlPresence {
    fn id(&self) -> RuleId {
        RuleId::ControlPresence
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        // plate -> (wells, vehicle wells)
        let mut plates: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for well in ctx.wells {
            let entry = plates.entry(well.plate.as_str()).or_default();
            entry.0 += 1;
            if well.is_vehicle() {
                entry.1 += 1;
            }
        }

        let violations = plates
            .into_iter()
            .filter(|(_, (_, vehicles))| *vehicles == 0)
            .map(|(plate, (wells, _))| {
                Violation::new(
                    self.id(),
                    format!("plate {} has no vehicle control well", plate),
                )
                .with_suggestion("Add at least one vehicle (DMSO) well to this plate")
                .with_details(json!({ "plate": plate, "wells": wells }))
            })
            .collect();

        Ok(violations)
    }
}

/// Wells lie inside the configured plate format. Skipped without a format.
pub struct PositionInBounds;

impl Rule for PositionInBounds {
    fn id(&self) -> RuleId {
        RuleId::PositionInBounds
    }

    fn check(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let format = ctx
            .config
            .plate_format
            .ok_or_else(|| RuleSkip::new("no plate format configured"))?;

        let violations = ctx
            .wells
            .iter()
            .enumerate()
            .filter(|(_, well)| !format.contains(well.row, well.column))
            .map(|(index, well)| {
                Violation::new(
                    self.id(),
                    format!(
                        "well {} lies outside the {}x{} plate format",
                        well.display_id(index),
                        format.rows,
                        format.columns
                    ),
                )
                .with_suggestion("Move the well onto the plate or change the plate format")
                .with_details(well_details(index, well))
            })
            .collect();

        Ok(violations)
    }
}
