//! platecert - deterministic validation certificates for plate designs
//!
//! Validates a generated plate design (wells assigning compound, dose,
//! cell line and timepoint to plate positions) against a fixed battery of
//! structural and provenance rules and issues a single certificate.
//!
//! ```ignore
//! use platecert::certificate::build;
//!
//! let certificate = build(&wells, Some(&metadata))?;
//! if !certificate.is_passing() {
//!     for violation in certificate.violations() {
//!         eprintln!("{}", violation);
//!     }
//! }
//! ```

pub mod certificate;
pub mod cli;
pub mod design;
pub mod observability;
pub mod provenance;
pub mod rules;

pub use certificate::{build, CertificateBuilder, DesignCertificate};
pub use design::{DesignMetadata, Well};
pub use rules::{RuleConfig, Violation, ViolationSeverity};
