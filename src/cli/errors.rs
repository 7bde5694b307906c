//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status.

use std::fmt;
use std::io;

use crate::design::DesignError;
use crate::rules::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Rule configuration error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Design document is malformed input
    InvalidDesign,
    /// Certificate is failing under --strict
    CertificateFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PLATECERT_CLI_CONFIG_ERROR",
            Self::IoError => "PLATECERT_CLI_IO_ERROR",
            Self::InvalidDesign => "PLATECERT_CLI_INVALID_DESIGN",
            Self::CertificateFailed => "PLATECERT_CLI_CERTIFICATE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_design(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidDesign, msg)
    }

    /// Failing certificate under --strict
    pub fn certificate_failed(errors: usize) -> Self {
        Self::new(
            CliErrorCode::CertificateFailed,
            format!("certificate is failing with {} error violation(s)", errors),
        )
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DesignError> for CliError {
    fn from(e: DesignError) -> Self {
        Self::invalid_design(format!("{} ({})", e, e.code()))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(format!("{} ({})", e, e.code()))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::certificate_failed(2);
        assert_eq!(err.code_str(), "PLATECERT_CLI_CERTIFICATE_FAILED");
        assert!(err.to_string().starts_with("PLATECERT_CLI_CERTIFICATE_FAILED: "));
        assert!(err.message().contains('2'));
    }

    #[test]
    fn test_design_error_conversion() {
        let err: CliError = DesignError::EmptyPlateId { index: 4 }.into();
        assert_eq!(err.code(), &CliErrorCode::InvalidDesign);
        assert!(err.message().contains("PLATECERT_EMPTY_PLATE_ID"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CliError = ConfigError::Invalid("min_replicates must be > 0".into()).into();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
