//! Input contract errors
//!
//! These errors describe malformed input to a validation call. A defect in
//! the design itself is never reported here; it becomes a violation inside
//! the certificate.
//!
//! Error codes:
//! - PLATECERT_EMPTY_PLATE_ID
//! - PLATECERT_INVALID_POSITION
//! - PLATECERT_EMPTY_CELL_LINE
//! - PLATECERT_EMPTY_COMPOUND
//! - PLATECERT_NON_FINITE
//! - PLATECERT_MALFORMED_METADATA
//! - PLATECERT_MALFORMED_DOCUMENT

use thiserror::Error;

/// Result type for design input operations
pub type DesignResult<T> = Result<T, DesignError>;

/// Malformed input to the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    #[error("well {index}: plate identifier is empty")]
    EmptyPlateId { index: usize },

    #[error("well {index}: position row {row}, column {column} is not 1-based")]
    InvalidPosition { index: usize, row: u16, column: u16 },

    #[error("well {index}: cell line identifier is empty")]
    EmptyCellLine { index: usize },

    #[error("well {index}: compound name is empty")]
    EmptyCompound { index: usize },

    #[error("well {index}: {field} is not a finite number")]
    NonFinite { index: usize, field: String },

    #[error("design metadata: {0}")]
    MalformedMetadata(String),

    #[error("design document: {0}")]
    MalformedDocument(String),
}

impl DesignError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DesignError::EmptyPlateId { .. } => "PLATECERT_EMPTY_PLATE_ID",
            DesignError::InvalidPosition { .. } => "PLATECERT_INVALID_POSITION",
            DesignError::EmptyCellLine { .. } => "PLATECERT_EMPTY_CELL_LINE",
            DesignError::EmptyCompound { .. } => "PLATECERT_EMPTY_COMPOUND",
            DesignError::NonFinite { .. } => "PLATECERT_NON_FINITE",
            DesignError::MalformedMetadata(_) => "PLATECERT_MALFORMED_METADATA",
            DesignError::MalformedDocument(_) => "PLATECERT_MALFORMED_DOCUMENT",
        }
    }

    /// Index of the offending well, if the error concerns one
    pub fn well_index(&self) -> Option<usize> {
        match self {
            DesignError::EmptyPlateId { index }
            | DesignError::InvalidPosition { index, .. }
            | DesignError::EmptyCellLine { index }
            | DesignError::EmptyCompound { index }
            | DesignError::NonFinite { index, .. } => Some(*index),
            DesignError::MalformedMetadata(_) | DesignError::MalformedDocument(_) => None,
        }
    }
}

impl From<serde_json::Error> for DesignError {
    fn from(e: serde_json::Error) -> Self {
        DesignError::MalformedDocument(e.to_string())
    }
}
