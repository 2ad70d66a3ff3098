//! Sikumnik content reports
//!
//! Scans a content directory, validates every chapter and exam it finds and
//! collects the results in a [`ValidationReport`]. Reports render to
//! Markdown for authors ([`MarkdownGenerator`]) and to JSON for tooling
//! ([`json::JsonGenerator`]). [`OutlineGenerator`] renders one chapter's
//! sections as a Markdown outline for proofreading.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use sikumnik_content::SchemaError;
//! use sikumnik_report::{DocumentKind, FileReport, MarkdownGenerator, ValidationReport};
//!
//! let report = ValidationReport {
//!     root: "content".to_string(),
//!     strict_hebrew: false,
//!     generated_at: Utc::now(),
//!     files: vec![FileReport {
//!         path: "accounting/chapter-1.json".to_string(),
//!         kind: DocumentKind::Chapter,
//!         errors: vec![SchemaError::missing("bridge")],
//!         warnings: vec![],
//!     }],
//! };
//!
//! assert!(!report.is_clean());
//! let markdown = MarkdownGenerator::new(&report).generate();
//! assert!(markdown.contains("`bridge`"));
//! ```

pub mod json;
mod markdown;
mod outline;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sikumnik_content::{
    parse, parse_exam, read_json_document, reading_order_key, ContentError, SchemaError,
    Validator, Warning, EXAMS_DIR,
};

pub use markdown::MarkdownGenerator;
pub use outline::OutlineGenerator;

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur while building or writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The report could not be serialized to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The report file could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// A directory under the content root could not be listed.
    #[error("cannot read content directory '{path}': {source}\n\nSuggestion: Check that the path exists and points at the folder holding your course directories")]
    ContentDir {
        /// The directory that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Report model
// ============================================================================

/// Which schema a file is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A chapter document, `<course>/<chapter>.json`.
    Chapter,
    /// An exam document, `<course>/exams/<exam>.json`.
    Exam,
}

impl DocumentKind {
    /// Infers the kind from where the file lives.
    #[must_use]
    pub fn infer(path: &Path) -> Self {
        let in_exams = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|name| name == EXAMS_DIR);
        if in_exams {
            Self::Exam
        } else {
            Self::Chapter
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Exam => "exam",
        }
    }
}

/// Overall state of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// No errors, no warnings.
    Valid,
    /// Loads, but has warnings.
    Warnings,
    /// Has at least one error.
    Invalid,
}

/// Validation result for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the content root, `/`-separated.
    pub path: String,
    /// Schema the file was checked against.
    pub kind: DocumentKind,
    /// Structural errors, including unreadable-file errors at `$`.
    pub errors: Vec<SchemaError>,
    /// Non-fatal problems.
    pub warnings: Vec<Warning>,
}

impl FileReport {
    /// Reads and validates one file.
    ///
    /// Never fails: a file that cannot be read or is not JSON gets a single
    /// error at `$` describing why.
    #[must_use]
    pub fn check(
        root: &Path,
        path: &Path,
        kind: DocumentKind,
        validator: &Validator,
        max_bytes: u64,
    ) -> Self {
        let display = display_path(root, path);

        let raw = match read_json_document(path, max_bytes, || {
            ContentError::Io(std::io::ErrorKind::NotFound.into())
        }) {
            Ok(raw) => raw,
            Err(ContentError::Schema(e)) => return Self::unreadable(display, kind, e),
            Err(e) => {
                let message = e.to_string();
                let first_line = message.lines().next().unwrap_or_default();
                return Self::unreadable(display, kind, SchemaError::invalid("$", first_line));
            }
        };

        let outcome = match kind {
            DocumentKind::Chapter => validator.validate_chapter(&raw),
            DocumentKind::Exam => validator.validate_exam(&raw),
        };
        let mut errors = outcome.errors;

        // The typed layer must agree with the structural checks.
        if errors.is_empty() {
            let typed = match kind {
                DocumentKind::Chapter => parse(&raw).map(drop),
                DocumentKind::Exam => parse_exam(&raw).map(drop),
            };
            if let Err(e) = typed {
                errors.push(e);
            }
        }

        Self {
            path: display,
            kind,
            errors,
            warnings: outcome.warnings,
        }
    }

    fn unreadable(path: String, kind: DocumentKind, error: SchemaError) -> Self {
        Self {
            path,
            kind,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    /// Returns the file's overall status.
    #[must_use]
    pub fn status(&self) -> FileStatus {
        if !self.errors.is_empty() {
            FileStatus::Invalid
        } else if !self.warnings.is_empty() {
            FileStatus::Warnings
        } else {
            FileStatus::Valid
        }
    }
}

/// Counts over a whole report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Files checked.
    pub files: usize,
    /// Files with no issues.
    pub valid: usize,
    /// Files that load but have warnings.
    pub with_warnings: usize,
    /// Files with errors.
    pub invalid: usize,
    /// Total errors.
    pub errors: usize,
    /// Total warnings.
    pub warnings: usize,
}

/// Validation results for a content directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// The scanned directory, as given.
    pub root: String,
    /// Whether Hebrew checks were on.
    pub strict_hebrew: bool,
    /// When the scan ran.
    pub generated_at: DateTime<Utc>,
    /// Per-file results, courses in reading order, chapters before exams.
    pub files: Vec<FileReport>,
}

impl ValidationReport {
    /// Wraps already-checked files in a report stamped with the current time.
    #[must_use]
    pub fn new(root: impl Into<String>, strict_hebrew: bool, files: Vec<FileReport>) -> Self {
        Self {
            root: root.into(),
            strict_hebrew,
            generated_at: Utc::now(),
            files,
        }
    }

    /// Validates every document under `root`.
    ///
    /// Course directories are the direct subdirectories of `root`. Each
    /// `<course>/*.json` is a chapter and each `<course>/exams/*.json` is an
    /// exam. Hidden entries and files at the root itself are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::ContentDir` if a directory cannot be listed.
    pub fn scan(root: &Path, validator: &Validator, max_bytes: u64) -> Result<Self> {
        let mut files = Vec::new();

        for course in list_entries(root, EntryKind::Directory)? {
            let course_dir = root.join(&course);

            for name in list_entries(&course_dir, EntryKind::Json)? {
                files.push(FileReport::check(
                    root,
                    &course_dir.join(name),
                    DocumentKind::Chapter,
                    validator,
                    max_bytes,
                ));
            }

            let exams_dir = course_dir.join(EXAMS_DIR);
            if exams_dir.is_dir() {
                for name in list_entries(&exams_dir, EntryKind::Json)? {
                    files.push(FileReport::check(
                        root,
                        &exams_dir.join(name),
                        DocumentKind::Exam,
                        validator,
                        max_bytes,
                    ));
                }
            }
        }

        Ok(Self::new(
            root.display().to_string(),
            validator.strict_hebrew(),
            files,
        ))
    }

    /// Computes the summary counts.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            files: self.files.len(),
            ..ReportSummary::default()
        };
        for file in &self.files {
            match file.status() {
                FileStatus::Valid => summary.valid += 1,
                FileStatus::Warnings => summary.with_warnings += 1,
                FileStatus::Invalid => summary.invalid += 1,
            }
            summary.errors += file.errors.len();
            summary.warnings += file.warnings.len();
        }
        summary
    }

    /// Returns `true` if no file has errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.files.iter().all(|f| f.errors.is_empty())
    }
}

// ============================================================================
// Directory walking
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    Json,
}

/// Lists entry names of one kind, in reading order.
fn list_entries(dir: &Path, kind: EntryKind) -> Result<Vec<String>> {
    let to_error = |source: std::io::Error| ReportError::ContentDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(to_error)? {
        let path = entry.map_err(to_error)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let wanted = match kind {
            EntryKind::Directory => path.is_dir() && name != EXAMS_DIR,
            EntryKind::Json => path.is_file() && path.extension().is_some_and(|e| e == "json"),
        };
        if wanted {
            names.push(name.to_string());
        }
    }

    names.sort_by(|a, b| {
        reading_order_key(a.trim_end_matches(".json"))
            .cmp(&reading_order_key(b.trim_end_matches(".json")))
    });
    Ok(names)
}

/// `path` relative to `root`, with `/` separators.
fn display_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
