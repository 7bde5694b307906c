//! Plate design data model
//!
//! A design is a flat collection of wells plus optional author metadata.
//!
//! - Wells are identified by `(plate, row, column)`, rows and columns 1-based
//! - A well is either a vehicle control or a named compound at a dose
//! - Measurements may be partially populated and never affect identity

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::errors::{DesignError, DesignResult};

/// Reserved compound name marking a vehicle control well
pub const VEHICLE_SENTINEL: &str = "DMSO";

/// Input alias accepted for the vehicle sentinel
const VEHICLE_ALIAS: &str = "vehicle";

/// Compound assignment of a well.
///
/// Serialized as a plain string; the vehicle is written as `DMSO`.
/// On input, `DMSO`, `vehicle` (any case, surrounding whitespace ignored)
/// and a null or missing compound all denote the vehicle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Compound {
    /// Vehicle control, carries no compound
    #[default]
    Vehicle,
    /// Named test compound
    Named(String),
}

impl Compound {
    /// Create a named compound, mapping the sentinel names to the vehicle
    pub fn named(name: impl Into<String>) -> Self {
        Compound::from(Some(name.into()))
    }

    /// Returns true for the vehicle control
    pub fn is_vehicle(&self) -> bool {
        matches!(self, Compound::Vehicle)
    }

    /// Returns the compound name, `None` for the vehicle
    pub fn name(&self) -> Option<&str> {
        match self {
            Compound::Vehicle => None,
            Compound::Named(name) => Some(name),
        }
    }

    /// Returns the name used on the wire and in reports
    pub fn as_str(&self) -> &str {
        match self {
            Compound::Vehicle => VEHICLE_SENTINEL,
            Compound::Named(name) => name,
        }
    }
}

impl From<Option<String>> for Compound {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Compound::Vehicle,
            Some(name)
                if name.trim().eq_ignore_ascii_case(VEHICLE_SENTINEL)
                    || name.trim().eq_ignore_ascii_case(VEHICLE_ALIAS) =>
            {
                Compound::Vehicle
            }
            Some(name) => Compound::Named(name),
        }
    }
}

impl From<Compound> for Option<String> {
    fn from(value: Compound) -> Self {
        Some(value.as_str().to_string())
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical position of a well: plate plus 1-based row and column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WellPosition {
    pub plate: String,
    pub row: u16,
    pub column: u16,
}

impl WellPosition {
    /// Plate-local label such as `A01` or `AB12`
    pub fn label(&self) -> String {
        format!("{}{:02}", row_letters(self.row), self.column)
    }
}

impl fmt::Display for WellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.plate, self.label())
    }
}

/// Spreadsheet-style row letters: 1 -> A, 26 -> Z, 27 -> AA
fn row_letters(row: u16) -> String {
    let mut n = row as u32;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// One physical measurement unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    /// Caller-supplied identifier, used when reporting this well
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub plate: String,
    pub row: u16,
    pub column: u16,
    #[serde(default)]
    pub compound: Compound,
    pub dose: f64,
    pub cell_line: String,
    /// Hours after treatment
    pub timepoint: f64,
    /// QC replicate, excluded from potency analysis
    #[serde(default)]
    pub is_sentinel: bool,
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,
}

impl Well {
    /// Create a vehicle control well at dose zero
    pub fn vehicle(
        plate: impl Into<String>,
        row: u16,
        column: u16,
        cell_line: impl Into<String>,
        timepoint: f64,
    ) -> Self {
        Self {
            id: None,
            plate: plate.into(),
            row,
            column,
            compound: Compound::Vehicle,
            dose: 0.0,
            cell_line: cell_line.into(),
            timepoint,
            is_sentinel: false,
            measurements: BTreeMap::new(),
        }
    }

    /// Create a compound well
    pub fn treated(
        plate: impl Into<String>,
        row: u16,
        column: u16,
        compound: impl Into<String>,
        dose: f64,
        cell_line: impl Into<String>,
        timepoint: f64,
    ) -> Self {
        Self {
            compound: Compound::named(compound),
            dose,
            ..Self::vehicle(plate, row, column, cell_line, timepoint)
        }
    }

    /// Set the caller-supplied identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark as a sentinel QC replicate
    pub fn as_sentinel(mut self) -> Self {
        self.is_sentinel = true;
        self
    }

    /// Record a measurement
    pub fn with_measurement(mut self, metric: impl Into<String>, value: f64) -> Self {
        self.measurements.insert(metric.into(), value);
        self
    }

    /// Returns true for vehicle control wells
    pub fn is_vehicle(&self) -> bool {
        self.compound.is_vehicle()
    }

    /// Returns the physical position
    pub fn position(&self) -> WellPosition {
        WellPosition {
            plate: self.plate.clone(),
            row: self.row,
            column: self.column,
        }
    }

    /// Identifier used in violation details.
    ///
    /// The caller-supplied id when present, otherwise the position plus the
    /// well's index in the input collection, which keeps wells sharing a
    /// position distinguishable.
    pub fn display_id(&self, index: usize) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}#{}", self.position(), index),
        }
    }

    /// Orders wells by `(plate, row, column)`
    pub fn cmp_position(&self, other: &Well) -> Ordering {
        self.plate
            .cmp(&other.plate)
            .then(self.row.cmp(&other.row))
            .then(self.column.cmp(&other.column))
    }

    /// Checks the identity and numeric fields of this well.
    ///
    /// Dose sign and vehicle/compound consistency are design properties
    /// checked by the rule engine, not here.
    pub fn validate(&self, index: usize) -> DesignResult<()> {
        if self.plate.trim().is_empty() {
            return Err(DesignError::EmptyPlateId { index });
        }
        if self.row == 0 || self.column == 0 {
            return Err(DesignError::InvalidPosition {
                index,
                row: self.row,
                column: self.column,
            });
        }
        if self.cell_line.trim().is_empty() {
            return Err(DesignError::EmptyCellLine { index });
        }
        if let Compound::Named(name) = &self.compound {
            if name.trim().is_empty() {
                return Err(DesignError::EmptyCompound { index });
            }
        }
        if !self.dose.is_finite() {
            return Err(non_finite(index, "dose"));
        }
        if !self.timepoint.is_finite() {
            return Err(non_finite(index, "timepoint"));
        }
        for (metric, value) in &self.measurements {
            if !value.is_finite() {
                return Err(non_finite(index, &format!("measurement '{}'", metric)));
            }
        }
        Ok(())
    }
}

fn non_finite(index: usize, field: &str) -> DesignError {
    DesignError::NonFinite {
        index,
        field: field.to_string(),
    }
}

/// Validates every well of a collection, reporting the first malformed one
pub fn validate_wells(wells: &[Well]) -> DesignResult<()> {
    wells
        .iter()
        .enumerate()
        .try_for_each(|(index, well)| well.validate(index))
}

/// Hash declared by the design author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedHashes {
    pub scaffold_hash: String,
}

/// Hash stamped by the environment that materialized the design
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedHashes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaffold_hash: Option<String>,
}

/// Author-supplied description of the intended design.
///
/// Created once at submission time and consumed read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignMetadata {
    pub scaffold_id: String,
    pub expected: ExpectedHashes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<ObservedHashes>,
}

impl DesignMetadata {
    /// Metadata with only the author's expected hash
    pub fn new(scaffold_id: impl Into<String>, expected_hash: impl Into<String>) -> Self {
        Self {
            scaffold_id: scaffold_id.into(),
            expected: ExpectedHashes {
                scaffold_hash: expected_hash.into(),
            },
            observed: None,
        }
    }

    /// Attach the hash observed at materialization
    pub fn with_observed(mut self, observed_hash: impl Into<String>) -> Self {
        self.observed = Some(ObservedHashes {
            scaffold_hash: Some(observed_hash.into()),
        });
        self
    }

    /// The observed scaffold hash, if one was recorded
    pub fn observed_scaffold_hash(&self) -> Option<&str> {
        self.observed
            .as_ref()
            .and_then(|o| o.scaffold_hash.as_deref())
    }

    /// Checks that required metadata fields are populated
    pub fn validate(&self) -> DesignResult<()> {
        if self.scaffold_id.trim().is_empty() {
            return Err(DesignError::MalformedMetadata("scaffoldId is empty".into()));
        }
        if self.expected.scaffold_hash.trim().is_empty() {
            return Err(DesignError::MalformedMetadata(
                "expected.scaffoldHash is empty".into(),
            ));
        }
        if let Some(observed) = self.observed_scaffold_hash() {
            if observed.trim().is_empty() {
                return Err(DesignError::MalformedMetadata(
                    "observed.scaffoldHash is present but empty".into(),
                ));
            }
        }
        Ok(())
    }
}
