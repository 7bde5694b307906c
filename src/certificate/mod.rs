//! Design certificates
//!
//! A certificate is the single, immutable output of one validation call:
//! summary stats, ordered violations and the provenance block.
//!
//! # Principles
//!
//! 1. Built fresh on every call, never cached
//! 2. Pass/fail is derived: passing iff no error-severity violation
//! 3. Grouping and sorting are view concerns (see [`view`])
//! 4. Bit-identical output for identical input

mod builder;
mod certificate;
pub mod view;

pub use builder::{build, CertificateBuilder};
pub use certificate::{CertificateStats, DesignCertificate};
pub use view::{count_by_severity, SeverityCounts, ViolationGroup, ViolationGroups};
