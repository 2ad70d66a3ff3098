//! Where chapters and exams come from.
//!
//! The [`ContentSource`] trait is the lookup seam used by the API and the
//! CLI. [`FsLibrary`] reads the on-disk layout
//!
//! ```text
//! <root>/<course>/<chapter>.json
//! <root>/<course>/exams/<exam>.json
//! ```
//!
//! and [`MemoryLibrary`] holds raw documents in memory. Both parse on every
//! load, so a document that fails validation is reported as unavailable
//! rather than served.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::Config;
use crate::error::{ContentError, Result, SchemaError};
use crate::schema::{parse, parse_exam, ChapterDocument, ExamDocument};

/// Name of the per-course exam directory.
pub const EXAMS_DIR: &str = "exams";

/// Read access to a content library.
pub trait ContentSource: Send + Sync {
    /// Loads and parses a chapter.
    fn load_chapter(&self, course: &str, chapter: &str) -> Result<ChapterDocument>;

    /// Loads and parses an exam.
    fn load_exam(&self, course: &str, exam: &str) -> Result<ExamDocument>;

    /// Lists course ids, sorted.
    fn list_courses(&self) -> Result<Vec<String>>;

    /// Lists a course's chapter ids in reading order.
    fn list_chapters(&self, course: &str) -> Result<Vec<String>>;
}

/// Returns `true` for ids matching `[a-z0-9][a-z0-9-]*`.
#[must_use]
pub fn is_valid_identifier(id: &str) -> bool {
    let mut chars = id.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Rejects ids that could escape the content root.
///
/// # Errors
///
/// Returns `ContentError::InvalidIdentifier` for anything outside
/// `[a-z0-9][a-z0-9-]*`.
pub fn validate_identifier(id: &str) -> Result<()> {
    if is_valid_identifier(id) {
        Ok(())
    } else {
        Err(ContentError::invalid_identifier(id))
    }
}

/// Sort key that puts `chapter-2` before `chapter-10`.
#[must_use]
pub fn reading_order_key(id: &str) -> (&str, u64, &str) {
    let prefix = id.trim_end_matches(|c: char| c.is_ascii_digit());
    let number = id[prefix.len()..].parse().unwrap_or(0);
    (prefix, number, id)
}

/// Reads a JSON document with the size and encoding checks.
///
/// `not_found` builds the error returned when the file does not exist.
///
/// # Errors
///
/// Returns the `not_found` error, `ContentError::DocumentTooLarge`,
/// `ContentError::DocumentEncoding`, a `Syntax` schema error for bad JSON,
/// or `ContentError::Io`.
pub fn read_json_document(
    path: &Path,
    max_bytes: u64,
    not_found: impl FnOnce() -> ContentError,
) -> Result<Value> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(not_found()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(ContentError::Io(e)),
    };

    let size = metadata.len();
    if size > max_bytes {
        return Err(ContentError::document_too_large(path, size, max_bytes));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            ContentError::document_encoding(path)
        } else {
            ContentError::Io(e)
        }
    })?;

    serde_json::from_str(&text).map_err(|e| SchemaError::syntax(e.to_string()).into())
}

// ============================================================================
// Filesystem library
// ============================================================================

/// A library backed by a directory tree.
#[derive(Debug, Clone)]
pub struct FsLibrary {
    root: PathBuf,
    max_document_bytes: u64,
}

impl FsLibrary {
    /// Creates a library rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, max_document_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_document_bytes,
        }
    }

    /// Creates a library from `contentDir` and `maxDocumentBytes`.
    ///
    /// A relative `contentDir` is resolved against `base`, normally the
    /// directory holding `sikumnik.json`.
    #[must_use]
    pub fn from_config(config: &Config, base: &Path) -> Self {
        Self::new(base.join(&config.content_dir), config.max_document_bytes)
    }

    /// The content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn course_dir(&self, course: &str) -> Result<PathBuf> {
        validate_identifier(course)?;
        let dir = self.root.join(course);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(ContentError::course_not_found(course))
        }
    }

    /// Path of a chapter file. The course directory must exist.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` or `CourseNotFound`.
    pub fn chapter_path(&self, course: &str, chapter: &str) -> Result<PathBuf> {
        validate_identifier(chapter)?;
        Ok(self.course_dir(course)?.join(format!("{chapter}.json")))
    }

    /// Path of an exam file. The course directory must exist.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` or `CourseNotFound`.
    pub fn exam_path(&self, course: &str, exam: &str) -> Result<PathBuf> {
        validate_identifier(exam)?;
        Ok(self
            .course_dir(course)?
            .join(EXAMS_DIR)
            .join(format!("{exam}.json")))
    }

    fn list_ids(dir: &Path, want_dirs: bool) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let id = if want_dirs {
                path.is_dir().then(|| path.file_name()).flatten()
            } else {
                let is_json = path.extension().is_some_and(|ext| ext == "json");
                (path.is_file() && is_json).then(|| path.file_stem()).flatten()
            };
            if let Some(id) = id.and_then(|id| id.to_str()) {
                if is_valid_identifier(id) && !(want_dirs && id == EXAMS_DIR) {
                    ids.push(id.to_string());
                }
            }
        }
        ids.sort_by(|a, b| reading_order_key(a).cmp(&reading_order_key(b)));
        Ok(ids)
    }
}

impl ContentSource for FsLibrary {
    fn load_chapter(&self, course: &str, chapter: &str) -> Result<ChapterDocument> {
        let path = self.chapter_path(course, chapter)?;
        let raw = read_json_document(&path, self.max_document_bytes, || {
            ContentError::chapter_not_found(course, chapter)
        })?;
        let doc = parse(&raw).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Chapter failed validation");
            e
        })?;
        tracing::debug!(course, chapter, "Loaded chapter");
        Ok(doc)
    }

    fn load_exam(&self, course: &str, exam: &str) -> Result<ExamDocument> {
        let path = self.exam_path(course, exam)?;
        let raw = read_json_document(&path, self.max_document_bytes, || {
            ContentError::exam_not_found(course, exam)
        })?;
        let doc = parse_exam(&raw).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Exam failed validation");
            e
        })?;
        Ok(doc)
    }

    fn list_courses(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            tracing::warn!(root = %self.root.display(), "Content directory does not exist");
            return Ok(Vec::new());
        }
        Self::list_ids(&self.root, true)
    }

    fn list_chapters(&self, course: &str) -> Result<Vec<String>> {
        let dir = self.course_dir(course)?;
        Self::list_ids(&dir, false)
    }
}

// ============================================================================
// In-memory library
// ============================================================================

/// A library of raw documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    chapters: BTreeMap<String, BTreeMap<String, Value>>,
    exams: BTreeMap<String, BTreeMap<String, Value>>,
}

impl MemoryLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a raw chapter document.
    #[must_use]
    pub fn with_chapter(mut self, course: &str, chapter: &str, raw: Value) -> Self {
        self.chapters
            .entry(course.to_string())
            .or_default()
            .insert(chapter.to_string(), raw);
        self
    }

    /// Adds a raw exam document.
    #[must_use]
    pub fn with_exam(mut self, course: &str, exam: &str, raw: Value) -> Self {
        self.exams
            .entry(course.to_string())
            .or_default()
            .insert(exam.to_string(), raw);
        self
    }

    fn has_course(&self, course: &str) -> bool {
        self.chapters.contains_key(course) || self.exams.contains_key(course)
    }
}

impl ContentSource for MemoryLibrary {
    fn load_chapter(&self, course: &str, chapter: &str) -> Result<ChapterDocument> {
        validate_identifier(course)?;
        validate_identifier(chapter)?;
        if !self.has_course(course) {
            return Err(ContentError::course_not_found(course));
        }
        let raw = self
            .chapters
            .get(course)
            .and_then(|chapters| chapters.get(chapter))
            .ok_or_else(|| ContentError::chapter_not_found(course, chapter))?;
        Ok(parse(raw)?)
    }

    fn load_exam(&self, course: &str, exam: &str) -> Result<ExamDocument> {
        validate_identifier(course)?;
        validate_identifier(exam)?;
        if !self.has_course(course) {
            return Err(ContentError::course_not_found(course));
        }
        let raw = self
            .exams
            .get(course)
            .and_then(|exams| exams.get(exam))
            .ok_or_else(|| ContentError::exam_not_found(course, exam))?;
        Ok(parse_exam(raw)?)
    }

    fn list_courses(&self) -> Result<Vec<String>> {
        let mut courses: Vec<String> = self
            .chapters
            .keys()
            .chain(self.exams.keys())
            .cloned()
            .collect();
        courses.sort();
        courses.dedup();
        Ok(courses)
    }

    fn list_chapters(&self, course: &str) -> Result<Vec<String>> {
        validate_identifier(course)?;
        if !self.has_course(course) {
            return Err(ContentError::course_not_found(course));
        }
        let mut ids: Vec<String> = self
            .chapters
            .get(course)
            .map(|chapters| chapters.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort_by(|a, b| reading_order_key(a).cmp(&reading_order_key(b)));
        Ok(ids)
    }
}
