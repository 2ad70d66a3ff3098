//! Typed content documents and the parse boundary.
//!
//! Raw JSON enters through [`parse`] (chapters) or [`parse_exam`] (exams).
//! Both run the [`Validator`] first so that failures name the exact field,
//! then deserialize into the typed model. Documents that get past this
//! boundary uphold every structural invariant.

mod chapter;
mod exam;

pub use chapter::*;
pub use exam::*;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::validate::Validator;

/// Parses a raw chapter value.
///
/// Returns the first structural error found; use
/// [`Validator::validate_chapter`] to collect all of them.
pub fn parse(raw: &Value) -> Result<ChapterDocument, SchemaError> {
    first_error(Validator::default().validate_chapter(raw).errors)?;
    ChapterDocument::deserialize(raw).map_err(|e| SchemaError::invalid("$", e.to_string()))
}

/// Parses chapter JSON text.
pub fn parse_str(text: &str) -> Result<ChapterDocument, SchemaError> {
    let raw: Value = serde_json::from_str(text).map_err(|e| SchemaError::syntax(e.to_string()))?;
    parse(&raw)
}

/// Parses a raw exam value.
pub fn parse_exam(raw: &Value) -> Result<ExamDocument, SchemaError> {
    first_error(Validator::default().validate_exam(raw).errors)?;
    ExamDocument::deserialize(raw).map_err(|e| SchemaError::invalid("$", e.to_string()))
}

/// Parses exam JSON text.
pub fn parse_exam_str(text: &str) -> Result<ExamDocument, SchemaError> {
    let raw: Value = serde_json::from_str(text).map_err(|e| SchemaError::syntax(e.to_string()))?;
    parse_exam(&raw)
}

fn first_error(errors: Vec<SchemaError>) -> Result<(), SchemaError> {
    match errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{JsonKind, SchemaReason};
    use crate::test_support::minimal_chapter;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_chapter() {
        let doc = parse(&minimal_chapter()).unwrap();
        assert_eq!(doc.id, "chapter-1");
        assert_eq!(doc.chapter_number, 1);
        assert!(doc.formal_definitions.formulas.is_empty());
        assert!(doc.deep_dive.is_none());
        assert!(!doc.is_last());
    }

    #[test]
    fn test_parse_missing_title() {
        let mut raw = minimal_chapter();
        raw.as_object_mut().unwrap().remove("title");

        let err = parse(&raw).unwrap_err();
        assert_eq!(err, SchemaError::missing("title"));
    }

    #[test]
    fn test_parse_type_mismatch() {
        let mut raw = minimal_chapter();
        raw["chapterNumber"] = json!("one");

        let err = parse(&raw).unwrap_err();
        assert_eq!(err.field, "chapterNumber");
        assert_eq!(
            err.reason,
            SchemaReason::TypeMismatch {
                expected: JsonKind::Integer,
                actual: JsonKind::String
            }
        );
    }

    #[test]
    fn test_parse_empty_object() {
        let err = parse(&json!({})).unwrap_err();
        assert_eq!(err, SchemaError::missing("id"));
    }

    #[test]
    fn test_parse_exam_rejects_uncovered_wrong_option() {
        let err = parse_exam(&json!({
            "id": "e1", "title": "t", "passingScore": 60,
            "questions": [{
                "id": "q1", "number": 1, "type": "multiple-choice",
                "question": "q", "points": 5, "options": ["a", "b", "c"],
                "correctIndex": 0, "reasoning": { "correct": "c", "wrong": { "1": "no" } }
            }]
        }))
        .unwrap_err();
        assert_eq!(err.field, "questions[0].reasoning.wrong");
        assert!(matches!(err.reason, SchemaReason::Invalid { .. }));
    }

    #[test]
    fn test_parse_non_object_root() {
        let err = parse(&json!([1, 2])).unwrap_err();
        assert_eq!(err.field, "$");
    }

    #[test]
    fn test_parse_str_syntax_error() {
        let err = parse_str("{ not json").unwrap_err();
        assert!(matches!(err.reason, SchemaReason::Syntax { .. }));
        assert_eq!(err.field, "$");
    }

    #[test]
    fn test_parse_exam_str() {
        let exam = parse_exam_str(
            r#"{
                "id": "e1",
                "title": "t",
                "passingScore": 55,
                "questions": [{
                    "id": "q1", "number": 1, "type": "multiple-choice",
                    "question": "q", "points": 5, "options": ["a", "b"],
                    "correctIndex": 0, "reasoning": { "correct": "c", "wrong": { "1": "w" } }
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(exam.passing_score, 55);
        assert_eq!(exam.questions.len(), 1);
    }

    #[test]
    fn test_parse_exam_passing_score_range() {
        let err = parse_exam(&json!({
            "id": "e1", "title": "t", "passingScore": 120, "questions": []
        }))
        .unwrap_err();
        assert_eq!(err.field, "passingScore");
    }
}
