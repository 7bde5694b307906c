//! Invariant rule engine
//!
//! A fixed, ordered battery of independent checks over a well set.
//!
//! # Design Principles
//!
//! - Every rule is a pure, total function of wells, metadata and config
//! - A rule emits only its own violation type, with its own severity
//! - Output shape (per-instance or aggregate) is fixed per rule
//! - Evaluation order is fixed and fixes violation order
//! - A rule that cannot evaluate is skipped; the call still succeeds

mod catalog;
mod config;
mod coverage;
mod engine;
mod integrity;
mod rule;
mod structural;
mod violation;

pub use catalog::{rule_catalog, Emission, RuleDefinition, RuleId};
pub use config::{
    ConfigError, ConfigResult, PlateFormat, RuleConfig, DEFAULT_MIN_DISTINCT_DOSES,
    DEFAULT_MIN_DOSE_SPAN_DECADES, DEFAULT_MIN_REPLICATES, DEFAULT_PLATE_BALANCE_TOLERANCE,
};
pub use engine::{EvaluationReport, RuleEngine, SkippedRule};
pub use rule::{Rule, RuleContext, RuleResult, RuleSkip};
pub use violation::{Violation, ViolationSeverity};
