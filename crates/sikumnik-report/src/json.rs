//! JSON rendering of validation reports.
//!
//! The JSON form is the report itself plus its computed `summary`, so
//! tooling does not have to recount:
//!
//! ```json
//! {
//!   "root": "content",
//!   "strictHebrew": false,
//!   "generatedAt": "2024-03-01T09:30:00Z",
//!   "files": [{ "path": "...", "kind": "chapter", "errors": [], "warnings": [] }],
//!   "summary": { "files": 1, "valid": 1, "withWarnings": 0, "invalid": 0, "errors": 0, "warnings": 0 }
//! }
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::{ReportSummary, Result, ValidationReport};

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a ValidationReport,
    summary: ReportSummary,
}

/// Serializes a [`ValidationReport`] to JSON.
pub struct JsonGenerator<'a> {
    report: &'a ValidationReport,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a generator for the given report.
    #[must_use]
    pub const fn new(report: &'a ValidationReport) -> Self {
        Self { report }
    }

    fn payload(&self) -> JsonReport<'a> {
        JsonReport {
            report: self.report,
            summary: self.report.summary(),
        }
    }

    /// Single-line JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`](crate::ReportError::Serialization)
    /// if serialization fails.
    pub fn generate(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.payload())?)
    }

    /// Indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`](crate::ReportError::Serialization)
    /// if serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.payload())?)
    }

    /// Writes the report to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if the file cannot be written, or
    /// `ReportError::Serialization` if serialization fails.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}
