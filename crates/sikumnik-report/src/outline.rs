//! Markdown outlines of rendered chapters.
//!
//! An outline is a proofreading aid: every section the page would show, in
//! page order, with text run through the auto-formatter and math normalized
//! to `$...$` and `$$...$$` delimiters.

use std::fmt::Write;

use serde_json::Value;
use sikumnik_content::schema::{DeepDive, InteractiveBlock};
use sikumnik_content::{format_text, segment_math_text, CheckpointItem, Section, Span};

/// Renders chapter sections as a Markdown outline.
pub struct OutlineGenerator<'s, 'a, W> {
    sections: &'s [Section<'a, W>],
}

impl<'s, 'a, W> OutlineGenerator<'s, 'a, W> {
    /// Creates a generator over sections from
    /// [`render_chapter_sections`](sikumnik_content::render_chapter_sections).
    #[must_use]
    pub const fn new(sections: &'s [Section<'a, W>]) -> Self {
        Self { sections }
    }

    /// Generates the outline.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        for section in self.sections {
            write_section(&mut output, section);
        }
        output
    }
}

#[allow(clippy::too_many_lines)]
fn write_section<W>(output: &mut String, section: &Section<'_, W>) {
    match section {
        Section::PageMap(page) => {
            let _ = writeln!(output, "# {}\n", page.title);
            let position = format!("פרק {} מתוך {}", page.chapter_number, page.total_chapters);
            match page.course {
                Some(course) => {
                    let _ = writeln!(output, "*{course} · {position}*\n");
                }
                None => {
                    let _ = writeln!(output, "*{position}*\n");
                }
            }
            let _ = writeln!(output, "זמן משוער: {}\n", page.page_map.estimated_time);
            for objective in &page.page_map.learning_objectives {
                let _ = writeln!(output, "- {}", text(objective));
            }
            let _ = writeln!(output);
        }
        Section::PrerequisiteReview(items) => {
            heading(output, section);
            for item in *items {
                let _ = writeln!(output, "- **{}**: {}", item.concept, text(&item.brief_review));
            }
            let _ = writeln!(output);
        }
        Section::Introduction(intro) => {
            heading(output, section);
            paragraph(output, &intro.content);
            paragraph(output, &intro.why_it_matters);
            if let Some(connection) = &intro.real_world_connection {
                paragraph(output, connection);
            }
        }
        Section::TeaserAnalogy(analogy) => {
            heading(output, section);
            paragraph(output, &analogy.content);
        }
        Section::FormalDefinitions(defs) => {
            heading(output, section);
            for concept in &defs.concepts {
                let _ = writeln!(output, "### {}\n", concept.title);
                paragraph(output, &concept.content);
            }
            for formula in &defs.formulas {
                let _ = writeln!(output, "### {}\n", formula.title);
                let _ = writeln!(output, "$$\n{}\n$$\n", formula.formula);
            }
        }
        Section::ToneBreak(tone) => {
            heading(output, section);
            let _ = writeln!(output, "**{}**\n", tone.opener);
            paragraph(output, &tone.content);
        }
        Section::DeepDive(deep_dive) => {
            heading(output, section);
            if let Some(title) = deep_dive.title() {
                let _ = writeln!(output, "### {title}\n");
            }
            write_deep_dive(output, deep_dive);
        }
        Section::CommonMistakes(mistakes) => {
            heading(output, section);
            for mistake in *mistakes {
                let _ = writeln!(
                    output,
                    "- ✗ {}\n  ✓ {}",
                    text(&mistake.mistake),
                    text(&mistake.correct)
                );
            }
            let _ = writeln!(output);
        }
        Section::Interactive(slot) => {
            heading(output, section);
            let title = slot.element.title.as_deref().unwrap_or(&slot.element.id);
            let _ = writeln!(output, "**{title}** (`{}`)\n", slot.element.id);
            if let InteractiveBlock::ClassificationGame { instructions, items } = &slot.element.block
            {
                paragraph(output, instructions);
                for item in items {
                    let _ = writeln!(output, "- {} → {}", item.label, item.correct_category);
                }
                let _ = writeln!(output);
            }
        }
        Section::Checkpoint(items) => {
            heading(output, section);
            for (number, item) in items.iter().enumerate() {
                write_checkpoint_item(output, number + 1, item);
            }
        }
        Section::StreetSummary(summary) => {
            heading(output, section);
            paragraph(output, &summary.content);
        }
        Section::Exercises(exercises) => {
            heading(output, section);
            if let Value::Array(guided) = exercises.guided {
                if !guided.is_empty() {
                    let _ = writeln!(output, "*{} תרגילים מודרכים*\n", guided.len());
                }
            }
            for (number, exercise) in exercises.independent.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "{}. {} (רמה {})",
                    number + 1,
                    text(&exercise.question),
                    exercise.difficulty
                );
                let _ = writeln!(output, "   תשובה: {}", text(&exercise.answer));
            }
            if !exercises.independent.is_empty() {
                let _ = writeln!(output);
            }
        }
        Section::QuickReference(reference) => {
            heading(output, section);
            for formula in &reference.formulas {
                let _ = writeln!(output, "- {}: ${}$", formula.name, formula.formula);
            }
            for definition in &reference.definitions {
                let _ = writeln!(output, "- **{}**: {}", definition.term, text(&definition.definition));
            }
            let _ = writeln!(output);
        }
        Section::Trivia(items) => {
            heading(output, section);
            for item in *items {
                let _ = writeln!(output, "- {}", text(&item.fact));
            }
            let _ = writeln!(output);
        }
        Section::Bridge(bridge) => {
            heading(output, section);
            let _ = writeln!(output, "**{}**\n", bridge.next_chapter_title);
            paragraph(output, &bridge.content);
        }
    }
}

fn write_deep_dive(output: &mut String, deep_dive: &DeepDive) {
    match deep_dive {
        DeepDive::Determinants {
            content,
            determinants,
            ..
        } => {
            if let Some(content) = content {
                paragraph(output, content);
            }
            for determinant in determinants {
                let _ = writeln!(output, "- **{}**: {}", determinant.title, text(&determinant.content));
            }
            let _ = writeln!(output);
        }
        DeepDive::Sections { sections, .. } => {
            for part in sections {
                let _ = writeln!(output, "#### {}\n", part.title);
                paragraph(output, &part.content);
            }
        }
        DeepDive::Narrative { content, .. } => paragraph(output, content),
        DeepDive::Opaque(_) => {
            let _ = writeln!(output, "*תוכן בפורמט מותאם*\n");
        }
    }
}

fn write_checkpoint_item(output: &mut String, number: usize, item: &CheckpointItem) {
    let _ = writeln!(output, "{number}. {}", text(item.question()));
    if let CheckpointItem::MultipleChoice(question) = item {
        for (index, option) in question.options.iter().enumerate() {
            let mark = if index == question.correct_index { "x" } else { " " };
            let _ = writeln!(output, "   - [{mark}] {}", text(option));
        }
    }
    let _ = writeln!(output, "   תשובה: {}\n", item.answer_text());
}

fn heading<W>(output: &mut String, section: &Section<'_, W>) {
    let _ = writeln!(output, "## {}\n", section_title(section));
}

fn section_title<W>(section: &Section<'_, W>) -> &'static str {
    match section {
        Section::PageMap(_) => "מפת הפרק",
        Section::PrerequisiteReview(_) => "חזרה על ידע קודם",
        Section::Introduction(_) => "מבוא",
        Section::TeaserAnalogy(_) => "אנלוגיה",
        Section::FormalDefinitions(_) => "הגדרות",
        Section::ToneBreak(_) => "בשפה פשוטה",
        Section::DeepDive(_) => "מבט לעומק",
        Section::CommonMistakes(_) => "טעויות נפוצות",
        Section::Interactive(_) => "המעבדה",
        Section::Checkpoint(_) => "בדוק את עצמך",
        Section::StreetSummary(_) => "סיכום",
        Section::Exercises(_) => "תרגול",
        Section::QuickReference(_) => "דף עזר",
        Section::Trivia(_) => "הידעת?",
        Section::Bridge(_) => "הפרק הבא",
    }
}

fn paragraph(output: &mut String, raw: &str) {
    let _ = writeln!(output, "{}\n", text(raw));
}

/// Formats a text field and rewrites its math with canonical delimiters.
fn text(raw: &str) -> String {
    let formatted = format_text(raw);
    let mut output = String::with_capacity(formatted.len());
    for span in segment_math_text(&formatted) {
        match span {
            Span::Text { html } => output.push_str(html),
            Span::InlineMath { expr } => {
                let _ = write!(output, "${expr}$");
            }
            Span::BlockMath { expr } => {
                let _ = write!(output, "$$\n{expr}\n$$");
            }
        }
    }
    output
}
