//! HTTP API tests over the on-disk fixtures
//!
//! Builds the router the way `sikumnik serve` does and drives it with
//! in-process requests.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sikumnik_content::{create_router, AppState, Config, FsLibrary};
use tower::ServiceExt;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Router over `fixtures/content` with the fixture config.
fn fixture_router() -> Router {
    let config = Config::load_from_dir(&fixtures_dir()).expect("Failed to load fixture config");
    let library = FsLibrary::from_config(&config, &fixtures_dir());
    create_router(AppState::new(config, Arc::new(library)))
}

/// Router over `fixtures/broken`.
fn broken_router() -> Router {
    let config = Config::default();
    let library = FsLibrary::new(fixtures_dir().join("broken"), config.max_document_bytes);
    create_router(AppState::new(config, Arc::new(library)))
}

async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };

    let response = router.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_course_and_chapter_listing() {
    let (status, body) = send(fixture_router(), Method::GET, "/api/courses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["courses"], json!(["accounting"]));

    let (status, body) = send(
        fixture_router(),
        Method::GET,
        "/api/courses/accounting/chapters",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chapters"], json!(["chapter-1", "chapter-2"]));
}

#[tokio::test]
async fn test_chapter_sections_in_page_order() {
    let (status, body) = send(
        fixture_router(),
        Method::GET,
        "/api/courses/accounting/chapters/chapter-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["chapter"]["id"], "chapter-1");
    assert_eq!(body["chapter"]["totalChapters"], 6);

    let kinds: Vec<_> = body["sections"]
        .as_array()
        .expect("sections should be an array")
        .iter()
        .map(|s| s["kind"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "pageMap",
            "prerequisiteReview",
            "introduction",
            "teaserAnalogy",
            "formalDefinitions",
            "toneBreak",
            "deepDive",
            "commonMistakes",
            "interactive",
            "checkpoint",
            "streetSummary",
            "exercises",
            "quickReference",
            "trivia",
            "bridge",
        ]
    );

    let interactive = &body["sections"][8]["data"];
    assert_eq!(interactive["widget"]["component"], "ClassificationGame");
    assert_eq!(interactive["element"]["id"], "balance-sorter");
}

#[tokio::test]
async fn test_unknown_chapter_is_not_found() {
    let (status, body) = send(
        fixture_router(),
        Method::GET,
        "/api/courses/accounting/chapters/chapter-99",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_invalid_identifier_is_bad_request() {
    let (status, _) = send(
        fixture_router(),
        Method::GET,
        "/api/courses/accounting/chapters/Chapter_1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_broken_chapters_are_unavailable() {
    for chapter in ["chapter-1", "chapter-2"] {
        let (status, body) = send(
            broken_router(),
            Method::GET,
            &format!("/api/courses/economics/chapters/{chapter}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{chapter}");
        assert!(body["error"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_exam_and_score() {
    let (status, body) = send(
        fixture_router(),
        Method::GET,
        "/api/courses/accounting/exams/midterm",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["passingScore"], 60);
    assert_eq!(body["questions"].as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        fixture_router(),
        Method::POST,
        "/api/courses/accounting/exams/midterm/score",
        Some(json!({ "answers": { "q1": 1, "q2": 0 }, "hintsUsed": ["q1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["percentage"], 90);
    assert_eq!(body["passed"], true);
    assert_eq!(body["correctCount"], 2);
}

#[tokio::test]
async fn test_text_endpoints() {
    let (status, body) = send(
        fixture_router(),
        Method::POST,
        "/api/text/format",
        Some(json!({ "text": "מהו נכס? משאב" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "מהו נכס?\nמשאב");

    let (status, body) = send(
        fixture_router(),
        Method::POST,
        "/api/text/classify",
        Some(json!({ "text": "ירידה בהוצאות" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["trend"].is_string());
}
