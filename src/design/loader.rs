//! Design document loading
//!
//! A design document is a single JSON object:
//!
//! ```json
//! { "wells": [ ... ], "metadata": { ... } }
//! ```
//!
//! `metadata` is optional. Loading parses and checks the input contract;
//! it does not evaluate any design rule.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

use super::errors::{DesignError, DesignResult};
use super::types::{validate_wells, DesignMetadata, Well};

/// A parsed design: wells plus optional metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub wells: Vec<Well>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DesignMetadata>,
}

impl DesignDocument {
    /// Create a document from already-loaded parts
    pub fn new(wells: Vec<Well>, metadata: Option<DesignMetadata>) -> Self {
        Self { wells, metadata }
    }

    /// Parse and check a document from a JSON string
    pub fn from_json_str(input: &str) -> DesignResult<Self> {
        if input.trim().is_empty() {
            return Err(DesignError::MalformedDocument("empty input".into()));
        }
        let doc: DesignDocument = serde_json::from_str(input)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse and check a document from a reader
    pub fn from_reader<R: Read>(mut reader: R) -> DesignResult<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| DesignError::MalformedDocument(format!("read failed: {}", e)))?;
        Self::from_json_str(&content)
    }

    /// Load and check a document from a file
    pub fn load(path: &Path) -> DesignResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DesignError::MalformedDocument(format!("failed to read {:?}: {}", path, e))
        })?;
        Self::from_json_str(&content)
    }

    /// Checks the input contract of wells and metadata
    pub fn validate(&self) -> DesignResult<()> {
        validate_wells(&self.wells)?;
        if let Some(metadata) = &self.metadata {
            metadata.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "wells": [
            {"plate": "P1", "row": 1, "column": 1, "compound": "DMSO", "dose": 0.0,
             "cell_line": "HeLa", "timepoint": 24.0},
            {"plate": "P1", "row": 1, "column": 2, "compound": "CMP-1", "dose": 1.5,
             "cell_line": "HeLa", "timepoint": 24.0, "is_sentinel": true,
             "measurements": {"viability": 0.82}}
        ],
        "metadata": {"scaffoldId": "S1", "expected": {"scaffoldHash": "abc"}}
    }"#;

    #[test]
    fn test_parse_document() {
        let doc = DesignDocument::from_json_str(DOC).unwrap();
        assert_eq!(doc.wells.len(), 2);
        assert!(doc.wells[0].is_vehicle());
        assert!(doc.wells[1].is_sentinel);
        assert_eq!(doc.wells[1].measurements.get("viability"), Some(&0.82));
        assert_eq!(doc.metadata.unwrap().scaffold_id, "S1");
    }

    #[test]
    fn test_metadata_is_optional() {
        let doc = DesignDocument::from_json_str(r#"{"wells": []}"#).unwrap();
        assert!(doc.wells.is_empty());
        assert!(doc.metadata.is_none());
    }

    #[test]
    fn test_missing_identity_field_is_malformed() {
        let err = DesignDocument::from_json_str(
            r#"{"wells": [{"row": 1, "column": 1, "dose": 0.0, "cell_line": "HeLa", "timepoint": 1.0}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "PLATECERT_MALFORMED_DOCUMENT");
    }

    #[test]
    fn test_contract_checks_run_after_parse() {
        let err = DesignDocument::from_json_str(
            r#"{"wells": [{"plate": "P1", "row": 0, "column": 1, "dose": 0.0, "cell_line": "HeLa", "timepoint": 1.0}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "PLATECERT_INVALID_POSITION");
    }

    #[test]
    fn test_empty_input() {
        assert!(DesignDocument::from_json_str("  ").is_err());
        assert!(DesignDocument::from_reader("".as_bytes()).is_err());
    }
}
