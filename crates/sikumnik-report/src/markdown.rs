//! Markdown rendering of validation reports.
//!
//! The output is meant for content authors: a summary table, then one
//! entry per file listing its errors and warnings by field path.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use sikumnik_content::{SchemaError, Warning};

use crate::{FileReport, FileStatus, ValidationReport};

/// Renders a [`ValidationReport`] as Markdown.
pub struct MarkdownGenerator<'a> {
    report: &'a ValidationReport,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a generator for the given report.
    #[must_use]
    pub const fn new(report: &'a ValidationReport) -> Self {
        Self { report }
    }

    /// Generates the full document.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_summary(&mut output);
        self.write_files(&mut output);
        self.write_footer(&mut output);

        output
    }

    fn write_title(&self, output: &mut String) {
        let _ = writeln!(
            output,
            "# Content Validation Report: {}\n",
            escape_markdown(&self.report.root)
        );
    }

    fn write_summary(&self, output: &mut String) {
        let summary = self.report.summary();
        let verdict = if self.report.is_clean() {
            "passed"
        } else {
            "failed"
        };

        let _ = writeln!(output, "## Summary\n");
        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(output, "| Result | {verdict} |");
        let _ = writeln!(output, "| Files checked | {} |", summary.files);
        let _ = writeln!(output, "| Valid | {} |", summary.valid);
        let _ = writeln!(output, "| With warnings | {} |", summary.with_warnings);
        let _ = writeln!(output, "| Invalid | {} |", summary.invalid);
        let _ = writeln!(output, "| Errors | {} |", summary.errors);
        let _ = writeln!(output, "| Warnings | {} |", summary.warnings);
        let _ = writeln!(
            output,
            "| Strict Hebrew | {} |",
            if self.report.strict_hebrew { "on" } else { "off" }
        );
        let _ = writeln!(output);
    }

    fn write_files(&self, output: &mut String) {
        let _ = writeln!(output, "## Files\n");

        if self.report.files.is_empty() {
            let _ = writeln!(output, "*No content files found.*\n");
            return;
        }

        for file in &self.report.files {
            Self::write_file(output, file);
        }
    }

    fn write_file(output: &mut String, file: &FileReport) {
        let status = file.status();
        let _ = writeln!(
            output,
            "### {} `{}` ({})\n",
            status_icon(status),
            escape_markdown_inline_code(&file.path),
            file.kind.as_str()
        );

        if status == FileStatus::Valid {
            let _ = writeln!(output, "*No issues.*\n");
            return;
        }

        if !file.errors.is_empty() {
            let _ = writeln!(output, "**Errors**\n");
            for error in &file.errors {
                let _ = writeln!(output, "{}", error_line(error));
            }
            let _ = writeln!(output);
        }

        if !file.warnings.is_empty() {
            let _ = writeln!(output, "**Warnings**\n");
            for warning in &file.warnings {
                let _ = writeln!(output, "{}", warning_line(warning));
            }
            let _ = writeln!(output);
        }
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---");
        let _ = writeln!(
            output,
            "*Generated by sikumnik at {}*",
            format_timestamp(&self.report.generated_at)
        );
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

const fn status_icon(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Valid => "&#9989;",
        FileStatus::Warnings => "&#9888;&#65039;",
        FileStatus::Invalid => "&#10060;",
    }
}

fn error_line(error: &SchemaError) -> String {
    format!(
        "- `{}`: {}",
        escape_markdown_inline_code(&error.field),
        escape_markdown(&error.reason.to_string())
    )
}

fn warning_line(warning: &Warning) -> String {
    format!(
        "- `{}`: {}",
        escape_markdown_inline_code(&warning.field),
        escape_markdown(&warning.message)
    )
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Escapes characters Markdown would treat as formatting.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '!' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(ch),
        }
    }
    result
}

fn escape_markdown_inline_code(text: &str) -> String {
    text.replace('`', "'")
}
