//! Error types for the Sikumnik content pipeline.
//!
//! Two layers live here: [`SchemaError`], a plain value describing why a
//! document failed structural validation, and [`ContentError`], the error
//! hierarchy for everything that touches configuration, the filesystem or
//! the content library.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

/// A specialized `Result` type for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;

// ============================================================================
// JSON kinds
// ============================================================================

/// The shape of a JSON value, as reported in type-mismatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    /// `null`.
    Null,
    /// `true` or `false`.
    Bool,
    /// A number without a fractional part.
    Integer,
    /// Any number.
    Number,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

impl JsonKind {
    /// Returns the kind of the given value.
    ///
    /// Integral numbers report [`JsonKind::Integer`]; every other number
    /// reports [`JsonKind::Number`].
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns `true` if a value of kind `actual` satisfies this expected kind.
    #[must_use]
    pub const fn accepts(self, actual: Self) -> bool {
        matches!(
            (self, actual),
            (Self::Number, Self::Integer | Self::Number)
                | (Self::Null, Self::Null)
                | (Self::Bool, Self::Bool)
                | (Self::Integer, Self::Integer)
                | (Self::String, Self::String)
                | (Self::Array, Self::Array)
                | (Self::Object, Self::Object)
        )
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "boolean"),
            Self::Integer => write!(f, "integer"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
        }
    }
}

// ============================================================================
// Schema errors
// ============================================================================

/// Why a document field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SchemaReason {
    /// A required field is absent.
    Missing,
    /// The field is present with the wrong JSON type.
    TypeMismatch {
        /// The kind the schema requires.
        expected: JsonKind,
        /// The kind found in the document.
        actual: JsonKind,
    },
    /// The field has the right type but violates a document invariant.
    Invalid {
        /// Description of the violated invariant.
        detail: String,
    },
    /// The raw text is not valid JSON.
    Syntax {
        /// Parser message.
        detail: String,
    },
}

impl fmt::Display for SchemaReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::TypeMismatch { expected, actual } => {
                write!(f, "type_mismatch (expected {expected}, got {actual})")
            }
            Self::Invalid { detail } => write!(f, "invalid ({detail})"),
            Self::Syntax { detail } => write!(f, "syntax ({detail})"),
        }
    }
}

/// A document failed structural validation.
///
/// `field` is a dotted path into the document, e.g. `pageMap.estimatedTime`
/// or `checkpoint[2].correctIndex`. The root is written `$`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("schema error at '{field}': {reason}")]
pub struct SchemaError {
    /// Path of the offending field.
    pub field: String,
    /// What is wrong with it.
    #[serde(flatten)]
    pub reason: SchemaReason,
}

impl SchemaError {
    /// Creates a `Missing` error for the given field.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: SchemaReason::Missing,
        }
    }

    /// Creates a `TypeMismatch` error for the given field.
    #[must_use]
    pub fn type_mismatch(field: impl Into<String>, expected: JsonKind, actual: JsonKind) -> Self {
        Self {
            field: field.into(),
            reason: SchemaReason::TypeMismatch { expected, actual },
        }
    }

    /// Creates an `Invalid` error for the given field.
    #[must_use]
    pub fn invalid(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: SchemaReason::Invalid {
                detail: detail.into(),
            },
        }
    }

    /// Creates a `Syntax` error for a document that is not valid JSON.
    #[must_use]
    pub fn syntax(detail: impl Into<String>) -> Self {
        Self {
            field: "$".to_string(),
            reason: SchemaReason::Syntax {
                detail: detail.into(),
            },
        }
    }
}

// ============================================================================
// Content errors
// ============================================================================

/// Errors that can occur while loading configuration or content.
///
/// Messages include an actionable suggestion where one exists.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your sikumnik.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// The requested course does not exist in the library.
    #[error("Course not found: '{course}'\n\nSuggestion: Check the course id or list available courses")]
    CourseNotFound {
        /// Requested course id.
        course: String,
    },

    /// The requested chapter does not exist in the library.
    #[error("Chapter not found: '{course}/{chapter}'\n\nSuggestion: Check the chapter id or list the course's chapters")]
    ChapterNotFound {
        /// Requested course id.
        course: String,
        /// Requested chapter id.
        chapter: String,
    },

    /// The requested exam does not exist in the library.
    #[error("Exam not found: '{course}/exams/{exam}'\n\nSuggestion: Check the exam id")]
    ExamNotFound {
        /// Requested course id.
        course: String,
        /// Requested exam id.
        exam: String,
    },

    /// An identifier contains characters outside `[a-z0-9-]`.
    #[error("Invalid identifier: '{id}'\n\nSuggestion: Identifiers use lowercase letters, digits and dashes only")]
    InvalidIdentifier {
        /// The rejected identifier.
        id: String,
    },

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// Document file exceeds the configured size limit.
    #[error("Document exceeds size limit ({limit_kb}KB): '{path}' is {size_kb}KB\n\nSuggestion: Split the chapter or raise maxDocumentBytes")]
    DocumentTooLarge {
        /// Path to the oversized document.
        path: PathBuf,
        /// Actual size in kilobytes.
        size_kb: u64,
        /// Configured limit in kilobytes.
        limit_kb: u64,
    },

    /// Document file contains non-UTF-8 content.
    #[error("Document has invalid encoding: '{path}'\n\nSuggestion: Convert the file to UTF-8 encoding")]
    DocumentEncoding {
        /// Path to the document with encoding issues.
        path: PathBuf,
    },

    /// Document failed structural validation.
    #[error("Content unavailable: {0}")]
    Schema(#[from] SchemaError),

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContentError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `CourseNotFound` error.
    #[must_use]
    pub fn course_not_found(course: impl Into<String>) -> Self {
        Self::CourseNotFound {
            course: course.into(),
        }
    }

    /// Creates a new `ChapterNotFound` error.
    #[must_use]
    pub fn chapter_not_found(course: impl Into<String>, chapter: impl Into<String>) -> Self {
        Self::ChapterNotFound {
            course: course.into(),
            chapter: chapter.into(),
        }
    }

    /// Creates a new `ExamNotFound` error.
    #[must_use]
    pub fn exam_not_found(course: impl Into<String>, exam: impl Into<String>) -> Self {
        Self::ExamNotFound {
            course: course.into(),
            exam: exam.into(),
        }
    }

    /// Creates a new `InvalidIdentifier` error.
    #[must_use]
    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        Self::InvalidIdentifier { id: id.into() }
    }

    /// Creates a new `DocumentTooLarge` error from byte counts.
    #[must_use]
    pub fn document_too_large(path: impl Into<PathBuf>, size_bytes: u64, limit_bytes: u64) -> Self {
        Self::DocumentTooLarge {
            path: path.into(),
            size_kb: size_bytes / 1024,
            limit_kb: limit_bytes / 1024,
        }
    }

    /// Creates a new `DocumentEncoding` error.
    #[must_use]
    pub fn document_encoding(path: impl Into<PathBuf>) -> Self {
        Self::DocumentEncoding { path: path.into() }
    }

    /// Returns `true` if the error means "the requested content does not exist".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CourseNotFound { .. } | Self::ChapterNotFound { .. } | Self::ExamNotFound { .. }
        )
    }

    /// Returns `true` if the content exists but cannot be shown.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Schema(_) | Self::DocumentTooLarge { .. } | Self::DocumentEncoding { .. }
        )
    }
}
