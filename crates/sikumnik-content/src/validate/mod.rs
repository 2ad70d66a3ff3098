//! Structural validation of raw content documents.
//!
//! The [`Validator`] walks a `serde_json::Value` and collects every
//! problem it finds: errors for anything that would stop the document from
//! loading and warnings for content that loads but looks wrong. Field paths
//! are dotted with bracketed indices, e.g. `checkpoint[2].correctIndex`.

mod chapter;
mod exam;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{JsonKind, SchemaError};

/// A non-fatal content problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Path of the field the warning refers to.
    pub field: String,
    /// What looks wrong.
    pub message: String,
}

/// Everything the validator found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    /// Structural errors, in document order.
    pub errors: Vec<SchemaError>,
    /// Warnings, in document order.
    pub warnings: Vec<Warning>,
}

impl ValidationOutcome {
    /// Returns `true` if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates raw chapter and exam documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    strict_hebrew: bool,
}

impl Validator {
    /// Creates a validator.
    ///
    /// With `strict_hebrew`, chapter titles and introductions that contain
    /// no Hebrew letters are reported as warnings.
    #[must_use]
    pub const fn new(strict_hebrew: bool) -> Self {
        Self { strict_hebrew }
    }

    /// Returns `true` if Hebrew checks are enabled.
    #[must_use]
    pub const fn strict_hebrew(&self) -> bool {
        self.strict_hebrew
    }

    /// Validates a raw chapter document.
    #[must_use]
    pub fn validate_chapter(&self, raw: &Value) -> ValidationOutcome {
        let mut walker = Walker::default();
        chapter::check_chapter(&mut walker, raw, self.strict_hebrew);
        walker.finish()
    }

    /// Validates a raw exam document.
    #[must_use]
    pub fn validate_exam(&self, raw: &Value) -> ValidationOutcome {
        let mut walker = Walker::default();
        exam::check_exam(&mut walker, raw);
        walker.finish()
    }
}

/// Returns `true` if the text contains at least one Hebrew character.
#[must_use]
pub fn contains_hebrew(text: &str) -> bool {
    text.chars().any(|c| ('\u{0590}'..='\u{05FF}').contains(&c))
}

// ============================================================================
// Walker
// ============================================================================

/// Joins a parent path and a key.
pub(crate) fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() || parent == "$" {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Appends an array index to a path.
pub(crate) fn index(parent: &str, i: usize) -> String {
    format!("{parent}[{i}]")
}

/// Accumulates issues while walking a document.
#[derive(Debug, Default)]
pub(crate) struct Walker {
    errors: Vec<SchemaError>,
    warnings: Vec<Warning>,
}

impl Walker {
    fn finish(self) -> ValidationOutcome {
        ValidationOutcome {
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    pub(crate) fn error(&mut self, err: SchemaError) {
        self.errors.push(err);
    }

    pub(crate) fn invalid(&mut self, field: impl Into<String>, detail: impl Into<String>) {
        self.errors.push(SchemaError::invalid(field, detail));
    }

    pub(crate) fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(Warning {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Checks that `value` has the expected kind.
    pub(crate) fn expect_kind(&mut self, value: &Value, path: &str, expected: JsonKind) -> bool {
        let actual = JsonKind::of(value);
        if expected.accepts(actual) {
            true
        } else {
            self.error(SchemaError::type_mismatch(path, expected, actual));
            false
        }
    }

    /// Checks that `value` is an object and returns it.
    pub(crate) fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        if self.expect_kind(value, path, JsonKind::Object) {
            value.as_object()
        } else {
            None
        }
    }

    /// Looks up a required key and checks its kind.
    pub(crate) fn required<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
        kind: JsonKind,
    ) -> Option<&'v Value> {
        let path = join(parent, key);
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.error(SchemaError::missing(path));
                None
            }
            Some(value) => self.expect_kind(value, &path, kind).then_some(value),
        }
    }

    /// Looks up an optional key and checks its kind. `null` counts as absent.
    pub(crate) fn optional<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
        kind: JsonKind,
    ) -> Option<&'v Value> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self
                .expect_kind(value, &join(parent, key), kind)
                .then_some(value),
        }
    }

    pub(crate) fn required_str<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v str> {
        self.required(obj, parent, key, JsonKind::String)
            .and_then(Value::as_str)
    }

    pub(crate) fn optional_str<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v str> {
        self.optional(obj, parent, key, JsonKind::String)
            .and_then(Value::as_str)
    }

    pub(crate) fn required_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        self.required(obj, parent, key, JsonKind::Object)
            .and_then(Value::as_object)
    }

    pub(crate) fn optional_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v Map<String, Value>> {
        self.optional(obj, parent, key, JsonKind::Object)
            .and_then(Value::as_object)
    }

    pub(crate) fn required_array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v [Value]> {
        self.required(obj, parent, key, JsonKind::Array)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub(crate) fn optional_array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v [Value]> {
        self.optional(obj, parent, key, JsonKind::Array)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub(crate) fn optional_bool(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<bool> {
        self.optional(obj, parent, key, JsonKind::Bool)
            .and_then(Value::as_bool)
    }

    /// Checks a non-negative integer that must fit in `u32`.
    fn check_uint(&mut self, value: &Value, path: &str) -> Option<u32> {
        if !self.expect_kind(value, path, JsonKind::Integer) {
            return None;
        }
        match value.as_u64().map(u32::try_from) {
            Some(Ok(n)) => Some(n),
            Some(Err(_)) => {
                self.invalid(path, "value is too large");
                None
            }
            None => {
                self.invalid(path, "must not be negative");
                None
            }
        }
    }

    pub(crate) fn required_uint(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<u32> {
        let path = join(parent, key);
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.error(SchemaError::missing(path));
                None
            }
            Some(value) => self.check_uint(value, &path),
        }
    }

    pub(crate) fn optional_uint(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) -> Option<u32> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.check_uint(value, &join(parent, key)),
        }
    }

    /// Checks that every element of an array is a string.
    pub(crate) fn string_items<'v>(&mut self, items: &'v [Value], path: &str) -> Vec<&'v str> {
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                self.expect_kind(item, &index(path, i), JsonKind::String)
                    .then(|| item.as_str())
                    .flatten()
            })
            .collect()
    }

    /// Runs `check` on every element of an array that is an object.
    pub(crate) fn each_object<'v>(
        &mut self,
        items: &'v [Value],
        path: &str,
        mut check: impl FnMut(&mut Self, &'v Map<String, Value>, &str),
    ) {
        for (i, item) in items.iter().enumerate() {
            let item_path = index(path, i);
            if let Some(obj) = self.object(item, &item_path) {
                check(self, obj, &item_path);
            }
        }
    }

    /// Warns about keys outside `known`.
    pub(crate) fn unknown_keys(&mut self, obj: &Map<String, Value>, parent: &str, known: &[&str]) {
        for key in obj.keys().filter(|k| !known.contains(&k.as_str())) {
            self.warn(join(parent, key), "unknown field");
        }
    }
}
