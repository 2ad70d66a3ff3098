//! End-to-end tests for the content pipeline
//!
//! Loads the on-disk fixtures through the filesystem library and runs them
//! through validation, rendering, reporting and scoring.

use std::path::PathBuf;

use sikumnik_content::{
    format_text, parse, read_json_document, render_chapter_sections, segment_math_text,
    ContentError, ContentSource, Config, ExamAnswers, FsLibrary, SectionKind, Span, Validator,
};
use sikumnik_report::{
    json::JsonGenerator, FileStatus, MarkdownGenerator, OutlineGenerator, ValidationReport,
};

const LIMIT: u64 = 512 * 1024;

/// Path to the fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn fixture_config() -> Config {
    Config::load_from_dir(&fixtures_dir()).expect("Failed to load fixture config")
}

fn fixture_library() -> FsLibrary {
    FsLibrary::from_config(&fixture_config(), &fixtures_dir())
}

#[test]
fn test_fixture_config_loads() {
    let config = fixture_config();

    assert_eq!(config.content_dir, "content");
    assert!(config.strict_hebrew);
    assert_eq!(config.port, 3100);
    assert_eq!(
        config
            .widget_registry()
            .get("balance-sorter")
            .map(|w| w.component.as_str()),
        Some("ClassificationGame")
    );
}

#[test]
fn test_library_lists_fixture_content() {
    let library = fixture_library();

    assert_eq!(library.list_courses().unwrap(), vec!["accounting"]);
    assert_eq!(
        library.list_chapters("accounting").unwrap(),
        vec!["chapter-1", "chapter-2"]
    );
}

#[test]
fn test_fixture_chapter_is_valid_in_strict_mode() {
    let path = fixtures_dir().join("content/accounting/chapter-1.json");
    let raw = read_json_document(&path, LIMIT, || {
        ContentError::chapter_not_found("accounting", "chapter-1")
    })
    .expect("Failed to read fixture chapter");

    let outcome = Validator::new(true).validate_chapter(&raw);
    assert!(outcome.errors.is_empty(), "errors: {:?}", outcome.errors);
    assert!(outcome.warnings.is_empty(), "warnings: {:?}", outcome.warnings);

    let doc = parse(&raw).expect("Fixture chapter should parse");
    assert_eq!(doc.title, "המאזן ומשוואת החשבונאות");
    assert!(!doc.is_last());
}

#[test]
fn test_library_rejects_missing_and_traversing_ids() {
    let library = fixture_library();

    let err = library.load_chapter("accounting", "chapter-9").unwrap_err();
    assert!(matches!(err, ContentError::ChapterNotFound { .. }));

    let err = library.load_chapter("accounting", "../x").unwrap_err();
    assert!(matches!(err, ContentError::InvalidIdentifier { .. }));
}

#[test]
fn test_render_fixture_chapter_in_page_order() {
    let config = fixture_config();
    let widgets = config.widget_registry();
    let doc = fixture_library()
        .load_chapter("accounting", "chapter-1")
        .unwrap();

    let kinds: Vec<_> = render_chapter_sections(&doc, Some(&widgets))
        .iter()
        .map(|s| s.kind())
        .collect();

    // The fixture fills every optional section, so all kinds appear.
    assert_eq!(kinds, SectionKind::ALL.to_vec());
}

#[test]
fn test_render_minimal_chapter_omits_optional_sections() {
    let config = fixture_config();
    let widgets = config.widget_registry();
    let doc = fixture_library()
        .load_chapter("accounting", "chapter-2")
        .unwrap();

    let kinds: Vec<_> = render_chapter_sections(&doc, Some(&widgets))
        .iter()
        .map(|s| s.kind())
        .collect();

    assert!(!kinds.contains(&SectionKind::PrerequisiteReview));
    assert!(!kinds.contains(&SectionKind::DeepDive));
    assert!(!kinds.contains(&SectionKind::Interactive));
    assert_eq!(kinds.first(), Some(&SectionKind::PageMap));
    assert_eq!(kinds.last(), Some(&SectionKind::Bridge));
}

#[test]
fn test_text_utilities_on_fixture_fields() {
    let doc = fixture_library()
        .load_chapter("accounting", "chapter-1")
        .unwrap();

    let intro = format_text(&doc.introduction.content);
    assert_eq!(
        intro,
        "כל עסק מחזיק משאבים. מי מימן אותם?\nזו השאלה שהמאזן עונה עליה."
    );

    let equity = format_text(&doc.formal_definitions.concepts[1].content);
    assert_eq!(
        equity,
        "הזכות השיורית של הבעלים:\n1. השקעות בעלים\n2. עודפים"
    );

    let spans: Vec<_> = segment_math_text(&doc.formal_definitions.concepts[0].content).collect();
    assert!(spans.contains(&Span::InlineMath { expr: "A" }));
}

#[test]
fn test_scan_fixture_content_is_clean() {
    let config = fixture_config();
    let root = fixtures_dir().join(&config.content_dir);

    let report = ValidationReport::scan(&root, &Validator::new(true), LIMIT).unwrap();
    let paths: Vec<_> = report.files.iter().map(|f| f.path.as_str()).collect();

    assert_eq!(
        paths,
        vec![
            "accounting/chapter-1.json",
            "accounting/chapter-2.json",
            "accounting/exams/midterm.json"
        ]
    );
    assert!(report.is_clean());
    assert_eq!(report.files[0].status(), FileStatus::Valid);

    // The minimal chapter has no course name or navigation.
    let warned: Vec<_> = report.files[1]
        .warnings
        .iter()
        .map(|w| w.field.as_str())
        .collect();
    assert_eq!(warned, vec!["course", "navigation"]);
}

#[test]
fn test_scan_broken_content_reports_every_problem() {
    let root = fixtures_dir().join("broken");
    let report = ValidationReport::scan(&root, &Validator::new(true), LIMIT).unwrap();

    assert!(!report.is_clean());
    let summary = report.summary();
    assert_eq!(summary.files, 3);
    assert_eq!(summary.invalid, 3);

    let chapter_errors: Vec<_> = report.files[0]
        .errors
        .iter()
        .map(|e| e.field.as_str())
        .collect();
    for field in [
        "chapterNumber",
        "formalDefinitions.concepts[0].tooltips.היצע",
        "checkpoint[0].correctIndex",
        "bridge",
    ] {
        assert!(
            chapter_errors.contains(&field),
            "expected error at {field}, got {chapter_errors:?}"
        );
    }

    let chapter_warnings: Vec<_> = report.files[0]
        .warnings
        .iter()
        .map(|w| w.field.as_str())
        .collect();
    assert!(chapter_warnings.contains(&"title"));
    assert!(chapter_warnings.contains(&"introduction.content"));

    assert_eq!(report.files[1].path, "economics/chapter-2.json");
    assert_eq!(report.files[1].errors[0].field, "$");

    assert_eq!(report.files[2].path, "economics/exams/final.json");
    assert!(report.files[2]
        .errors
        .iter()
        .any(|e| e.field == "passingScore"));

    let markdown = MarkdownGenerator::new(&report).generate();
    assert!(markdown.contains("| Result | failed |"));
    assert!(markdown.contains("`economics/exams/final.json` (exam)"));

    let json: serde_json::Value =
        serde_json::from_str(&JsonGenerator::new(&report).generate().unwrap()).unwrap();
    assert_eq!(json["summary"]["invalid"], 3);
}

#[test]
fn test_outline_of_fixture_chapter() {
    let config = fixture_config();
    let widgets = config.widget_registry();
    let doc = fixture_library()
        .load_chapter("accounting", "chapter-1")
        .unwrap();
    let sections = render_chapter_sections(&doc, Some(&widgets));

    let outline = OutlineGenerator::new(&sections).generate();

    assert!(outline.starts_with("# המאזן ומשוואת החשבונאות\n"));
    assert!(outline.contains("## המעבדה"));
    assert!(outline.contains("- מלאי → נכסים"));
    assert!(outline.contains("   - [x] מלאי"));
    assert!(outline.contains("$$\nA = L + E\n$$"));
}

#[test]
fn test_score_fixture_exam() {
    let exam = fixture_library().load_exam("accounting", "midterm").unwrap();

    let hinted = exam.score(
        &ExamAnswers::default()
            .answer("q1", 1)
            .with_hint("q1")
            .answer("q2", 1),
    );
    assert!((hinted.earned_points - 40.0).abs() < f64::EPSILON);
    assert_eq!(hinted.percentage, 40);
    assert!(!hinted.passed);

    let perfect = exam.score(&ExamAnswers::default().answer("q1", 1).answer("q2", 0));
    assert_eq!(perfect.percentage, 100);
    assert!(perfect.passed);
    assert_eq!(perfect.correct_count, 2);
}
