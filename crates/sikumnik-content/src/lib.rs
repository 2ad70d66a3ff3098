//! Sikumnik content pipeline
//!
//! Chapter and exam schemas, text utilities, section rendering, the
//! content library and the HTTP API that serves it.

pub mod api;
pub mod config;
pub mod connotation;
pub mod error;
pub mod library;
pub mod render;
pub mod schema;
pub mod text;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use api::{
    create_router, AppState, ChapterResponse, ChaptersResponse, CoursesResponse, ErrorResponse,
    FormatResponse, HealthResponse, SegmentResponse, TextRequest,
};
pub use config::{Config, WidgetConfig};
pub use connotation::{classify, Connotation, ConnotationRule, Trend};
pub use error::{ContentError, JsonKind, Result, SchemaError, SchemaReason};
pub use library::{
    is_valid_identifier, read_json_document, reading_order_key, validate_identifier,
    ContentSource, FsLibrary, MemoryLibrary, EXAMS_DIR,
};
pub use render::{render_chapter_sections, Section, SectionKind, WidgetRegistry};
pub use schema::{
    parse, parse_exam, parse_exam_str, parse_str, ChapterDocument, ChapterSummary, CheckpointItem,
    CheckpointKind, DeepDive, ExamAnswers, ExamDocument, ExamQuestion, ExamScore,
    InteractiveBlock, InteractiveElement, QuestionResult, HINT_CREDIT,
};
pub use text::{format_text, segment_math_text, MathSegments, Span};
pub use validate::{contains_hebrew, ValidationOutcome, Validator, Warning};
