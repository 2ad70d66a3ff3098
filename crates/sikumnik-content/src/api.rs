//! HTTP API serving content to the front end.
//!
//! # Endpoints
//!
//! - `GET /api/health` - Liveness probe
//! - `GET /api/courses` - List courses
//! - `GET /api/courses/:course/chapters` - List a course's chapters
//! - `GET /api/courses/:course/chapters/:chapter` - Rendered chapter sections
//! - `GET /api/courses/:course/exams/:exam` - Exam document
//! - `POST /api/courses/:course/exams/:exam/score` - Score a submission
//! - `POST /api/text/format` - Insert missing line breaks
//! - `POST /api/text/segment` - Split text into math spans
//! - `POST /api/text/classify` - Financial connotation of a term
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sikumnik_content::{create_router, AppState, Config, FsLibrary};
//!
//! # async fn example() -> std::io::Result<()> {
//! let config = Config::default();
//! let library = FsLibrary::new("content", config.max_document_bytes);
//! let router = create_router(AppState::new(config, Arc::new(library)));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, router).await
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::config::{Config, WidgetConfig};
use crate::connotation::{classify, Connotation};
use crate::error::ContentError;
use crate::library::ContentSource;
use crate::render::{render_chapter_sections, Section, WidgetRegistry};
use crate::schema::{ChapterSummary, ExamAnswers, ExamDocument, ExamScore};
use crate::text::{format_text, segment_math_text, Span};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response body for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Response body for the course list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursesResponse {
    /// Course ids.
    pub courses: Vec<String>,
}

/// Response body for a course's chapter list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaptersResponse {
    /// Course id.
    pub course: String,
    /// Chapter ids in reading order.
    pub chapters: Vec<String>,
}

/// Response body for a rendered chapter.
#[derive(Debug, Serialize)]
pub struct ChapterResponse<'a> {
    /// Identity of the chapter.
    pub chapter: ChapterSummary,
    /// Page sections in display order.
    pub sections: Vec<Section<'a, WidgetConfig>>,
}

/// Request body for the text endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    /// Input text.
    pub text: String,
}

/// Response body for the format endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatResponse {
    /// Formatted text.
    pub text: String,
}

/// Response body for the segment endpoint.
#[derive(Debug, Serialize)]
pub struct SegmentResponse<'a> {
    /// Spans in input order.
    pub spans: Vec<Span<'a>>,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Where content is read from.
    pub library: Arc<dyn ContentSource>,
    /// Widgets available to interactive slots.
    pub widgets: WidgetRegistry<WidgetConfig>,
}

impl AppState {
    /// Creates the state, building the widget registry from `config`.
    #[must_use]
    pub fn new(config: Config, library: Arc<dyn ContentSource>) -> Self {
        let widgets = config.widget_registry();
        Self {
            config,
            library,
            widgets,
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// The course, chapter or exam does not exist.
    NotFound(String),
    /// The request names an invalid identifier.
    BadRequest(String),
    /// The content exists but failed validation.
    Unavailable(String),
    /// Anything else.
    Internal(String),
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else if matches!(err, ContentError::InvalidIdentifier { .. }) {
            Self::BadRequest(err.to_string())
        } else if err.is_unavailable() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("failed to serialize response: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unavailable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::Internal(msg) => {
                error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Runs a library call on the blocking pool.
async fn with_library<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn ContentSource) -> crate::error::Result<T> + Send + 'static,
{
    let library = Arc::clone(&state.library);
    tokio::task::spawn_blocking(move || f(library.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("library task failed: {e}")))?
        .map_err(ApiError::from)
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// Routes live under `/api`, with permissive CORS for the front-end dev
/// server and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handle_health))
        .route("/courses", get(handle_courses))
        .route("/courses/:course/chapters", get(handle_chapters))
        .route("/courses/:course/chapters/:chapter", get(handle_chapter))
        .route("/courses/:course/exams/:exam", get(handle_exam))
        .route("/courses/:course/exams/:exam/score", post(handle_score))
        .route("/text/format", post(handle_format))
        .route("/text/segment", post(handle_segment))
        .route("/text/classify", post(handle_classify));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn handle_courses(State(state): State<Arc<AppState>>) -> Result<Json<CoursesResponse>, ApiError> {
    let courses = with_library(&state, |library| library.list_courses()).await?;
    Ok(Json(CoursesResponse { courses }))
}

async fn handle_chapters(
    State(state): State<Arc<AppState>>,
    Path(course): Path<String>,
) -> Result<Json<ChaptersResponse>, ApiError> {
    let lookup = course.clone();
    let chapters = with_library(&state, move |library| library.list_chapters(&lookup)).await?;
    Ok(Json(ChaptersResponse { course, chapters }))
}

/// Handler for `GET /api/courses/:course/chapters/:chapter`.
///
/// Responds with the chapter's identity and its rendered sections.
async fn handle_chapter(
    State(state): State<Arc<AppState>>,
    Path((course, chapter)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let doc = with_library(&state, move |library| library.load_chapter(&course, &chapter)).await?;

    let sections = render_chapter_sections(&doc, Some(&state.widgets));
    info!(chapter = %doc.id, sections = sections.len(), "Serving chapter");

    let body = serde_json::to_value(ChapterResponse {
        chapter: doc.summary(),
        sections,
    })?;
    Ok(Json(body))
}

async fn handle_exam(
    State(state): State<Arc<AppState>>,
    Path((course, exam)): Path<(String, String)>,
) -> Result<Json<ExamDocument>, ApiError> {
    let exam = with_library(&state, move |library| library.load_exam(&course, &exam)).await?;
    Ok(Json(exam))
}

/// Handler for `POST /api/courses/:course/exams/:exam/score`.
async fn handle_score(
    State(state): State<Arc<AppState>>,
    Path((course, exam)): Path<(String, String)>,
    Json(submission): Json<ExamAnswers>,
) -> Result<Json<ExamScore>, ApiError> {
    let exam = with_library(&state, move |library| library.load_exam(&course, &exam)).await?;
    let score = exam.score(&submission);
    info!(
        exam = %exam.id,
        percentage = score.percentage,
        passed = score.passed,
        "Scored exam submission"
    );
    Ok(Json(score))
}

async fn handle_format(Json(request): Json<TextRequest>) -> Json<FormatResponse> {
    Json(FormatResponse {
        text: format_text(&request.text),
    })
}

async fn handle_segment(Json(request): Json<TextRequest>) -> Result<Json<Value>, ApiError> {
    let spans = segment_math_text(&request.text).collect();
    Ok(Json(serde_json::to_value(SegmentResponse { spans })?))
}

async fn handle_classify(Json(request): Json<TextRequest>) -> Json<Connotation> {
    Json(classify(&request.text))
}
