//! Plate design model
//!
//! Wells, design metadata and the input contract every validation call
//! relies on.
//!
//! # Design Principles
//!
//! - Malformed input is an error returned to the caller
//! - Design defects are never errors here; the rule engine reports them
//! - Metadata is read-only once created

mod errors;
mod loader;
mod types;

pub use errors::{DesignError, DesignResult};
pub use loader::DesignDocument;
pub use types::{
    validate_wells, Compound, DesignMetadata, ExpectedHashes, ObservedHashes, Well, WellPosition,
    VEHICLE_SENTINEL,
};
