//! JSON I/O handling for CLI
//!
//! - Input: one design document from a file or stdin
//! - Output: one JSON object per command on stdout
//! - UTF-8 only

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::errors::CliResult;
use crate::design::DesignDocument;

/// Read a design document from `path`, or from stdin when absent
pub fn read_design(path: Option<&Path>) -> CliResult<DesignDocument> {
    let document = match path {
        Some(path) => DesignDocument::load(path)?,
        None => DesignDocument::from_reader(io::stdin().lock())?,
    };
    Ok(document)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_response_to(&mut io::stdout(), data)
}

/// Write a success response to a writer
pub fn write_response_to<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    write_line(writer, &json!({ "status": "ok", "data": data }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(
        &mut io::stdout(),
        &json!({ "status": "error", "code": code, "message": message }),
    )
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
