//! CLI command implementations
//!
//! Commands are thin clients: they load input, call the engine, log
//! around the call and print the result. No validation logic lives here.

use std::path::Path;

use serde_json::{json, Value};

use crate::certificate::{CertificateBuilder, DesignCertificate};
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::provenance::well_set_hash;
use crate::rules::{rule_catalog, RuleConfig, SkippedRule};

use super::args::Command;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_design, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let result = run_command(cli.command);

    // A failing certificate has already been printed.
    if let Err(e) = &result {
        if e.code() != &CliErrorCode::CertificateFailed {
            write_error(e.code_str(), e.message())?;
        }
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate {
            design,
            config,
            strict,
        } => validate(design.as_deref(), config.as_deref(), strict),
        Command::Hash { design } => hash(design.as_deref()),
        Command::Rules => rules(),
    }
}

/// Load rule configuration, falling back to defaults
pub fn load_config(path: Option<&Path>) -> CliResult<RuleConfig> {
    match path {
        Some(path) => {
            let config = RuleConfig::load(path)?;
            log_event_with_fields(Event::ConfigLoaded, &[("path", path.display().to_string().as_str())]);
            Ok(config)
        }
        None => Ok(RuleConfig::default()),
    }
}

/// Validate a design and print its certificate
///
/// With `strict`, a failing certificate is printed and then reported as
/// an error so the process exits non-zero.
pub fn validate(design: Option<&Path>, config: Option<&Path>, strict: bool) -> CliResult<()> {
    let builder = CertificateBuilder::new(load_config(config)?);

    let document = read_design(design).map_err(|e| {
        log_event_with_fields(Event::DesignRejected, &[("reason", e.message())]);
        e
    })?;
    let wells = document.wells.len().to_string();
    log_event_with_fields(Event::DesignLoaded, &[("wells", wells.as_str())]);

    let scope = ObservationScope::with_fields("CERTIFY", &[("wells", wells.as_str())]);
    let (certificate, skipped) =
        match builder.build_with_report(&document.wells, document.metadata.as_ref()) {
            Ok(built) => built,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e.into());
            }
        };

    log_skipped(&skipped);
    log_provenance(&certificate);

    let counts = certificate.count_by_severity();
    let passing = certificate.is_passing();
    write_response(certificate_envelope(&certificate)?)?;

    let errors = counts.errors.to_string();
    let warnings = counts.warnings.to_string();
    scope.complete_with_fields(&[("errors", errors.as_str()), ("warnings", warnings.as_str())]);

    let fields = [
        ("errors", errors.as_str()),
        ("warnings", warnings.as_str()),
        ("hash", certificate.scaffold_metadata().observed.well_derived_hash.as_str()),
    ];
    if passing {
        log_event_with_fields(Event::CertificateIssued, &fields);
    } else {
        log_event_with_fields(Event::CertificateFailed, &fields);
    }

    if strict && !passing {
        return Err(CliError::certificate_failed(counts.errors));
    }
    Ok(())
}

/// Response payload for a certificate, with derived pass/fail and counts
pub fn certificate_envelope(certificate: &DesignCertificate) -> CliResult<Value> {
    let counts = certificate.count_by_severity();
    Ok(json!({
        "certificate": serde_json::to_value(certificate)?,
        "isPassing": certificate.is_passing(),
        "errorCount": counts.errors,
        "warningCount": counts.warnings,
    }))
}

fn log_skipped(skipped: &[SkippedRule]) {
    for skip in skipped {
        log_event_with_fields(
            Event::RuleSkipped,
            &[("rule", skip.rule.as_str()), ("reason", skip.reason.as_str())],
        );
    }
}

fn log_provenance(certificate: &DesignCertificate) {
    for mismatch in certificate.scaffold_metadata().agreement().mismatches() {
        log_event_with_fields(
            Event::ProvenanceMismatch,
            &[
                ("left", mismatch.left.as_str()),
                ("right", mismatch.right.as_str()),
            ],
        );
    }
}

/// Print the well-derived hash of a design
pub fn hash(design: Option<&Path>) -> CliResult<()> {
    let document = read_design(design)?;
    let hash = well_set_hash(&document.wells);
    log_event_with_fields(
        Event::HashComputed,
        &[("wells", document.wells.len().to_string().as_str())],
    );
    write_response(json!({ "wellDerivedHash": hash }))
}

/// Print the rule catalog in evaluation order
pub fn rules() -> CliResult<()> {
    write_response(serde_json::to_value(rule_catalog())?)
}
