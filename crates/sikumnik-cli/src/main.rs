//! Sikumnik CLI
//!
//! Validates content directories, previews chapters, runs the text
//! utilities and serves the content API.

use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use sikumnik_content::{
    classify, create_router, format_text, render_chapter_sections, segment_math_text, AppState,
    ChapterResponse, Config, ContentSource, ExamAnswers, FsLibrary, SegmentResponse, Validator,
};
use sikumnik_report::{
    json::JsonGenerator, DocumentKind, FileReport, MarkdownGenerator, OutlineGenerator,
    ValidationReport,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Sikumnik - chapter content tools
///
/// Works on a content directory laid out as `<course>/<chapter>.json` and
/// `<course>/exams/<exam>.json`.
#[derive(Parser, Debug)]
#[command(name = "sikumnik")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (default: sikumnik.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Content directory, overriding contentDir from the config
    #[arg(long, value_name = "DIR", global = true)]
    content_dir: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a content directory or a single document
    Validate {
        /// File or directory to check (default: the content directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Warn about titles and introductions without Hebrew text
        #[arg(long)]
        strict_hebrew: bool,
    },

    /// Render a chapter's sections
    Render {
        /// Course id
        course: String,

        /// Chapter id
        chapter: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = RenderFormat::Outline)]
        format: RenderFormat,
    },

    /// Run the auto-formatter over text (`-` or no argument reads stdin)
    Format {
        /// Input file
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Split text into text and math spans, printed as JSON
    Segment {
        /// Input file
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Classify a financial term's connotation
    Classify {
        /// The term, e.g. "עלייה בהכנסות"
        term: String,
    },

    /// Score a submission against an exam
    Score {
        /// Course id
        course: String,

        /// Exam id
        exam: String,

        /// JSON file with `answers` and `hintsUsed` (`-` reads stdin)
        #[arg(long, value_name = "FILE")]
        answers: PathBuf,
    },

    /// Serve the content API
    Serve {
        /// Address to bind, overriding the config
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on, overriding the config
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RenderFormat {
    Outline,
    Json,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    ValidationFailed,
}

/// Loaded configuration plus the directory relative paths resolve against.
struct Settings {
    config: Config,
    base: PathBuf,
}

impl Settings {
    fn content_root(&self) -> PathBuf {
        self.base.join(&self.config.content_dir)
    }

    fn library(&self) -> FsLibrary {
        FsLibrary::from_config(&self.config, &self.base)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::ValidationFailed) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let settings = load_settings(cli.config.as_deref(), cli.content_dir)?;
    tracing::debug!(content_root = %settings.content_root().display(), "Settings loaded");

    match cli.command {
        Command::Validate {
            path,
            format,
            output,
            strict_hebrew,
        } => run_validate(&settings, path, format, output.as_deref(), strict_hebrew),
        Command::Render {
            course,
            chapter,
            format,
        } => run_render(&settings, &course, &chapter, format),
        Command::Format { input } => {
            let text = read_input(input.as_deref())?;
            println!("{}", format_text(text.trim_end_matches('\n')));
            Ok(Outcome::Success)
        }
        Command::Segment { input } => {
            let text = read_input(input.as_deref())?;
            let response = SegmentResponse {
                spans: segment_math_text(text.trim_end_matches('\n')).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(Outcome::Success)
        }
        Command::Classify { term } => {
            println!("{}", serde_json::to_string_pretty(&classify(&term))?);
            Ok(Outcome::Success)
        }
        Command::Score {
            course,
            exam,
            answers,
        } => run_score(&settings, &course, &exam, &answers),
        Command::Serve { host, port } => {
            let mut settings = settings;
            if let Some(host) = host {
                settings.config.host = host;
            }
            if let Some(port) = port {
                settings.config.port = port;
            }
            settings.config.validate()?;
            serve(settings).await?;
            Ok(Outcome::Success)
        }
    }
}

/// Loads the config and applies the `--content-dir` override.
///
/// Relative content directories resolve against the config file's directory,
/// or the working directory when no `--config` is given. An overriding
/// `--content-dir` always resolves against the working directory.
fn load_settings(
    config_path: Option<&Path>,
    content_dir: Option<PathBuf>,
) -> anyhow::Result<Settings> {
    let current_dir = std::env::current_dir()?;

    let (mut config, mut base) = match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            let config = Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))?;
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| current_dir.clone(), Path::to_path_buf);
            (config, base)
        }
        None => (
            Config::load().map_err(|e| anyhow::anyhow!("{e}"))?,
            current_dir.clone(),
        ),
    };

    if let Some(dir) = content_dir {
        config.content_dir = dir.to_string_lossy().into_owned();
        base = current_dir;
        config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;
    }

    Ok(Settings { config, base })
}

fn run_validate(
    settings: &Settings,
    path: Option<PathBuf>,
    format: ReportFormat,
    output: Option<&Path>,
    strict_hebrew: bool,
) -> anyhow::Result<Outcome> {
    let validator = Validator::new(strict_hebrew || settings.config.strict_hebrew);
    let max_bytes = settings.config.max_document_bytes;
    let target = path.unwrap_or_else(|| settings.content_root());

    let report = if target.is_file() {
        let root = target.parent().unwrap_or_else(|| Path::new(""));
        let file = FileReport::check(
            root,
            &target,
            DocumentKind::infer(&target),
            &validator,
            max_bytes,
        );
        ValidationReport::new(
            target.display().to_string(),
            validator.strict_hebrew(),
            vec![file],
        )
    } else {
        tracing::info!(root = %target.display(), "Scanning content directory");
        ValidationReport::scan(&target, &validator, max_bytes)?
    };

    let summary = report.summary();
    tracing::info!(
        files = summary.files,
        errors = summary.errors,
        warnings = summary.warnings,
        "Validation finished"
    );

    match (format, output) {
        (ReportFormat::Json, Some(path)) => {
            JsonGenerator::new(&report).write_to_file(path, true)?;
            println!("JSON report: {}", path.display());
        }
        (ReportFormat::Json, None) => {
            println!("{}", JsonGenerator::new(&report).generate_pretty()?);
        }
        (ReportFormat::Markdown, Some(path)) => {
            std::fs::write(path, MarkdownGenerator::new(&report).generate())?;
            println!("Markdown report: {}", path.display());
        }
        (ReportFormat::Markdown, None) => {
            print!("{}", MarkdownGenerator::new(&report).generate());
        }
    }

    if report.is_clean() {
        Ok(Outcome::Success)
    } else {
        eprintln!("{} of {} files have errors", summary.invalid, summary.files);
        Ok(Outcome::ValidationFailed)
    }
}

fn run_render(
    settings: &Settings,
    course: &str,
    chapter: &str,
    format: RenderFormat,
) -> anyhow::Result<Outcome> {
    let doc = settings.library().load_chapter(course, chapter)?;
    let widgets = settings.config.widget_registry();
    let sections = render_chapter_sections(&doc, Some(&widgets));

    match format {
        RenderFormat::Outline => print!("{}", OutlineGenerator::new(&sections).generate()),
        RenderFormat::Json => {
            let response = ChapterResponse {
                chapter: doc.summary(),
                sections,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(Outcome::Success)
}

fn run_score(
    settings: &Settings,
    course: &str,
    exam: &str,
    answers_path: &Path,
) -> anyhow::Result<Outcome> {
    let exam = settings.library().load_exam(course, exam)?;
    let submission: ExamAnswers = serde_json::from_str(&read_input(Some(answers_path))?)
        .map_err(|e| {
            anyhow::anyhow!(
                "Invalid answers file: {e}\n\nSuggestion: Use {{\"answers\": {{\"q1\": 0}}, \"hintsUsed\": [\"q1\"]}}"
            )
        })?;

    let score = exam.score(&submission);
    tracing::info!(
        exam = %exam.id,
        percentage = score.percentage,
        passed = score.passed,
        "Exam scored"
    );
    println!("{}", serde_json::to_string_pretty(&score)?);
    Ok(Outcome::Success)
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let addr: SocketAddr = settings.config.bind_address().parse().map_err(|e| {
        anyhow::anyhow!(
            "Invalid bind address '{}': {e}\n\nSuggestion: Use an IP address for host, e.g. 127.0.0.1",
            settings.config.bind_address()
        )
    })?;

    let library = settings.library();
    tracing::info!(root = %library.root().display(), "Serving content");

    let state = AppState::new(settings.config, Arc::new(library));
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port")
    })?;

    println!("Content API running on http://{addr}/api");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
}

/// Reads a file, or stdin for `None` and `-`.
fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read '{}': {e}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
