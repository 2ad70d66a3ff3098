//! Turning a chapter into an ordered list of page sections.
//!
//! The renderer does not produce markup. It decides which sections a
//! chapter page shows and in what order, and hands each one the slice of
//! the document it displays. Interactive slots are resolved against a
//! caller-supplied [`WidgetRegistry`].

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::schema::{
    Bridge, ChapterDocument, CheckpointItem, CommonMistake, DeepDive, FormalDefinitions,
    IndependentExercise, InteractiveElement, Introduction, Navigation, PageMap, PrerequisiteItem,
    QuickReference, StreetSummary, TeaserAnalogy, ToneBreak, TriviaItem,
};

// ============================================================================
// Widget registry
// ============================================================================

/// Maps interactive element ids to widgets.
///
/// `W` is whatever the host uses to draw a widget: a component name, a
/// factory, a config record.
#[derive(Debug, Clone)]
pub struct WidgetRegistry<W> {
    widgets: HashMap<String, W>,
}

impl<W> Default for WidgetRegistry<W> {
    fn default() -> Self {
        Self {
            widgets: HashMap::new(),
        }
    }
}

impl<W> WidgetRegistry<W> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a widget, replacing any previous one with the same id.
    pub fn register(&mut self, id: impl Into<String>, widget: W) -> Option<W> {
        self.widgets.insert(id.into(), widget)
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, widget: W) -> Self {
        self.register(id, widget);
        self
    }

    /// Looks up a widget.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&W> {
        self.widgets.get(id)
    }

    /// Number of registered widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl<W, K: Into<String>> FromIterator<(K, W)> for WidgetRegistry<W> {
    fn from_iter<I: IntoIterator<Item = (K, W)>>(iter: I) -> Self {
        Self {
            widgets: iter.into_iter().map(|(k, w)| (k.into(), w)).collect(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Section discriminator, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    /// Objectives and navigation.
    PageMap,
    /// Refreshers for earlier material.
    PrerequisiteReview,
    /// Opening text.
    Introduction,
    /// Everyday analogy.
    TeaserAnalogy,
    /// Concepts and formulas.
    FormalDefinitions,
    /// Informal explanation.
    ToneBreak,
    /// Extended discussion.
    DeepDive,
    /// Misconceptions.
    CommonMistakes,
    /// Interactive widget.
    Interactive,
    /// Comprehension quiz.
    Checkpoint,
    /// Recap.
    StreetSummary,
    /// Guided and independent exercises.
    Exercises,
    /// Cheat sheet.
    QuickReference,
    /// Fun facts.
    Trivia,
    /// Next-chapter teaser.
    Bridge,
}

impl SectionKind {
    /// Every section kind, in page order.
    pub const ALL: [Self; 15] = [
        Self::PageMap,
        Self::PrerequisiteReview,
        Self::Introduction,
        Self::TeaserAnalogy,
        Self::FormalDefinitions,
        Self::ToneBreak,
        Self::DeepDive,
        Self::CommonMistakes,
        Self::Interactive,
        Self::Checkpoint,
        Self::StreetSummary,
        Self::Exercises,
        Self::QuickReference,
        Self::Trivia,
        Self::Bridge,
    ];

    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PageMap => "pageMap",
            Self::PrerequisiteReview => "prerequisiteReview",
            Self::Introduction => "introduction",
            Self::TeaserAnalogy => "teaserAnalogy",
            Self::FormalDefinitions => "formalDefinitions",
            Self::ToneBreak => "toneBreak",
            Self::DeepDive => "deepDive",
            Self::CommonMistakes => "commonMistakes",
            Self::Interactive => "interactive",
            Self::Checkpoint => "checkpoint",
            Self::StreetSummary => "streetSummary",
            Self::Exercises => "exercises",
            Self::QuickReference => "quickReference",
            Self::Trivia => "trivia",
            Self::Bridge => "bridge",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data for the page map section.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMapSection<'a> {
    /// Chapter title.
    pub title: &'a str,
    /// Course name.
    pub course: Option<&'a str>,
    /// 1-based chapter position.
    pub chapter_number: u32,
    /// Chapter count.
    pub total_chapters: u32,
    /// Objectives, prerequisites and time.
    pub page_map: &'a PageMap,
    /// Neighbour links.
    pub navigation: Option<&'a Navigation>,
}

/// Data for the interactive section.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct InteractiveSection<'a, W> {
    /// The authored slot.
    pub element: &'a InteractiveElement,
    /// The widget resolved from the registry.
    pub widget: &'a W,
}

/// Data for the exercises section.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExercisesSection<'a> {
    /// Guided exercises, passed through as authored.
    pub guided: &'a Value,
    /// Independent exercises.
    pub independent: &'a [IndependentExercise],
}

/// One rendered section, borrowing from the chapter.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum Section<'a, W> {
    /// See [`SectionKind::PageMap`].
    PageMap(PageMapSection<'a>),
    /// See [`SectionKind::PrerequisiteReview`].
    PrerequisiteReview(&'a [PrerequisiteItem]),
    /// See [`SectionKind::Introduction`].
    Introduction(&'a Introduction),
    /// See [`SectionKind::TeaserAnalogy`].
    TeaserAnalogy(&'a TeaserAnalogy),
    /// See [`SectionKind::FormalDefinitions`].
    FormalDefinitions(&'a FormalDefinitions),
    /// See [`SectionKind::ToneBreak`].
    ToneBreak(&'a ToneBreak),
    /// See [`SectionKind::DeepDive`].
    DeepDive(&'a DeepDive),
    /// See [`SectionKind::CommonMistakes`].
    CommonMistakes(&'a [CommonMistake]),
    /// See [`SectionKind::Interactive`].
    Interactive(InteractiveSection<'a, W>),
    /// See [`SectionKind::Checkpoint`].
    Checkpoint(&'a [CheckpointItem]),
    /// See [`SectionKind::StreetSummary`].
    StreetSummary(&'a StreetSummary),
    /// See [`SectionKind::Exercises`].
    Exercises(ExercisesSection<'a>),
    /// See [`SectionKind::QuickReference`].
    QuickReference(&'a QuickReference),
    /// See [`SectionKind::Trivia`].
    Trivia(&'a [TriviaItem]),
    /// See [`SectionKind::Bridge`].
    Bridge(&'a Bridge),
}

impl<W> Section<'_, W> {
    /// Returns the section's discriminator.
    #[must_use]
    pub const fn kind(&self) -> SectionKind {
        match self {
            Self::PageMap(_) => SectionKind::PageMap,
            Self::PrerequisiteReview(_) => SectionKind::PrerequisiteReview,
            Self::Introduction(_) => SectionKind::Introduction,
            Self::TeaserAnalogy(_) => SectionKind::TeaserAnalogy,
            Self::FormalDefinitions(_) => SectionKind::FormalDefinitions,
            Self::ToneBreak(_) => SectionKind::ToneBreak,
            Self::DeepDive(_) => SectionKind::DeepDive,
            Self::CommonMistakes(_) => SectionKind::CommonMistakes,
            Self::Interactive(_) => SectionKind::Interactive,
            Self::Checkpoint(_) => SectionKind::Checkpoint,
            Self::StreetSummary(_) => SectionKind::StreetSummary,
            Self::Exercises(_) => SectionKind::Exercises,
            Self::QuickReference(_) => SectionKind::QuickReference,
            Self::Trivia(_) => SectionKind::Trivia,
            Self::Bridge(_) => SectionKind::Bridge,
        }
    }
}

/// Lays out a chapter as page sections.
///
/// Sections come out in [`SectionKind::ALL`] order. Optional sections
/// whose source field is absent or empty are omitted. The interactive slot
/// is included only when its id resolves in `registry`; an unresolved id is
/// logged and skipped.
pub fn render_chapter_sections<'a, W>(
    doc: &'a ChapterDocument,
    registry: Option<&'a WidgetRegistry<W>>,
) -> Vec<Section<'a, W>> {
    let mut sections = Vec::with_capacity(SectionKind::ALL.len());

    sections.push(Section::PageMap(PageMapSection {
        title: &doc.title,
        course: doc.course.as_deref(),
        chapter_number: doc.chapter_number,
        total_chapters: doc.total_chapters,
        page_map: &doc.page_map,
        navigation: doc.navigation.as_ref(),
    }));

    if let Some(items) = doc.prerequisite_review.as_deref() {
        if !items.is_empty() {
            sections.push(Section::PrerequisiteReview(items));
        }
    }

    sections.push(Section::Introduction(&doc.introduction));
    sections.push(Section::TeaserAnalogy(&doc.teaser_analogy));
    sections.push(Section::FormalDefinitions(&doc.formal_definitions));
    sections.push(Section::ToneBreak(&doc.tone_break));

    if let Some(deep_dive) = &doc.deep_dive {
        sections.push(Section::DeepDive(deep_dive));
    }

    sections.push(Section::CommonMistakes(&doc.common_mistakes));

    if let Some(element) = &doc.interactive_element {
        match registry.and_then(|r| r.get(&element.id)) {
            Some(widget) => sections.push(Section::Interactive(InteractiveSection { element, widget })),
            None => tracing::warn!(
                chapter = %doc.id,
                widget = %element.id,
                "Interactive widget not registered, skipping slot"
            ),
        }
    }

    sections.push(Section::Checkpoint(&doc.checkpoint));
    sections.push(Section::StreetSummary(&doc.street_summary));
    sections.push(Section::Exercises(ExercisesSection {
        guided: &doc.guided_exercises,
        independent: &doc.independent_exercises,
    }));
    sections.push(Section::QuickReference(&doc.quick_reference));
    sections.push(Section::Trivia(&doc.trivia));
    sections.push(Section::Bridge(&doc.bridge));

    tracing::debug!(chapter = %doc.id, sections = sections.len(), "Rendered chapter sections");
    sections
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::schema::parse;
    use crate::test_support::{minimal_chapter, rich_chapter};

    fn kinds<W>(sections: &[Section<'_, W>]) -> Vec<SectionKind> {
        sections.iter().map(Section::kind).collect()
    }

    #[test]
    fn test_minimal_chapter_sections() {
        let doc = parse(&minimal_chapter()).unwrap();
        let sections = render_chapter_sections::<&str>(&doc, None);

        assert_eq!(
            kinds(&sections),
            vec![
                SectionKind::PageMap,
                SectionKind::Introduction,
                SectionKind::TeaserAnalogy,
                SectionKind::FormalDefinitions,
                SectionKind::ToneBreak,
                SectionKind::CommonMistakes,
                SectionKind::Checkpoint,
                SectionKind::StreetSummary,
                SectionKind::Exercises,
                SectionKind::QuickReference,
                SectionKind::Trivia,
                SectionKind::Bridge,
            ]
        );
    }

    #[test]
    fn test_rich_chapter_with_registered_widget() {
        let doc = parse(&rich_chapter()).unwrap();
        let registry = WidgetRegistry::new().with("goods-sorter", "ClassificationGame");
        let sections = render_chapter_sections(&doc, Some(&registry));

        assert_eq!(kinds(&sections), SectionKind::ALL.to_vec());

        let widget = sections.iter().find_map(|s| match s {
            Section::Interactive(slot) => Some(*slot.widget),
            _ => None,
        });
        assert_eq!(widget, Some("ClassificationGame"));
    }

    #[test]
    fn test_unregistered_widget_is_skipped() {
        let doc = parse(&rich_chapter()).unwrap();
        let registry = WidgetRegistry::new().with("something-else", "X");
        let sections = render_chapter_sections(&doc, Some(&registry));

        assert!(!kinds(&sections).contains(&SectionKind::Interactive));
        assert_eq!(sections.len(), SectionKind::ALL.len() - 1);
    }

    #[test]
    fn test_sections_are_sorted() {
        let doc = parse(&rich_chapter()).unwrap();
        let sections = render_chapter_sections::<&str>(&doc, None);
        let kinds = kinds(&sections);
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn test_empty_prerequisite_review_is_omitted() {
        let mut raw = minimal_chapter();
        raw["prerequisiteReview"] = serde_json::json!([]);
        let doc = parse(&raw).unwrap();
        let sections = render_chapter_sections::<&str>(&doc, None);
        assert!(!kinds(&sections).contains(&SectionKind::PrerequisiteReview));
    }

    #[test]
    fn test_section_serialization() {
        let doc = parse(&minimal_chapter()).unwrap();
        let sections = render_chapter_sections::<&str>(&doc, None);
        let json = serde_json::to_value(&sections).unwrap();

        assert_eq!(json[0]["kind"], "pageMap");
        assert_eq!(json[0]["data"]["chapterNumber"], 1);
        assert_eq!(json[1]["kind"], "introduction");
        assert_eq!(json[1]["data"]["content"], "ברוכים הבאים");
    }

    #[test]
    fn test_registry_from_iter() {
        let registry: WidgetRegistry<u8> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("b"), Some(&2));
        assert!(WidgetRegistry::<u8>::new().is_empty());
    }
}
