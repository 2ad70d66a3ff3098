//! Chapter document types.
//!
//! A [`ChapterDocument`] is the authored JSON record for one lesson. The
//! types mirror the JSON shape one-to-one (camelCase keys); polymorphic
//! fields are modelled as enums with an explicit opaque fallback so that
//! content written for newer widgets still loads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The interactive block type rendered as a classification game.
pub const CLASSIFICATION_GAME: &str = "classification-game";

// ============================================================================
// ChapterDocument
// ============================================================================

/// One lesson's full content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDocument {
    /// Chapter identifier, e.g. `chapter-3`.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Course display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,

    /// 1-based position of the chapter in its course.
    pub chapter_number: u32,

    /// Number of chapters in the course.
    pub total_chapters: u32,

    /// Links to the neighbouring chapters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,

    /// Learning objectives and prerequisites banner.
    pub page_map: PageMap,

    /// Short refreshers of concepts from earlier chapters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite_review: Option<Vec<PrerequisiteItem>>,

    /// Opening text.
    pub introduction: Introduction,

    /// Everyday analogy shown before the formal material.
    pub teaser_analogy: TeaserAnalogy,

    /// Concepts and formulas.
    pub formal_definitions: FormalDefinitions,

    /// Informal "street" explanation.
    pub tone_break: ToneBreak,

    /// Optional extended discussion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_dive: Option<DeepDive>,

    /// Frequent misconceptions.
    pub common_mistakes: Vec<CommonMistake>,

    /// Optional interactive widget slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive_element: Option<InteractiveElement>,

    /// Quick comprehension quiz.
    pub checkpoint: Vec<CheckpointItem>,

    /// Plain-language recap.
    pub street_summary: StreetSummary,

    /// Worked exercises; the shape varies per course and is passed through.
    pub guided_exercises: Value,

    /// Practice exercises.
    pub independent_exercises: Vec<IndependentExercise>,

    /// Formula and definition cheat sheet.
    pub quick_reference: QuickReference,

    /// "Did you know" facts.
    pub trivia: Vec<TriviaItem>,

    /// Teaser for the next chapter.
    pub bridge: Bridge,
}

/// Identity of a chapter, without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    /// Chapter identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// 1-based position in the course.
    pub chapter_number: u32,
    /// Number of chapters in the course.
    pub total_chapters: u32,
}

impl ChapterDocument {
    /// Returns the chapter's identity fields.
    #[must_use]
    pub fn summary(&self) -> ChapterSummary {
        ChapterSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            chapter_number: self.chapter_number,
            total_chapters: self.total_chapters,
        }
    }

    /// Returns `true` if this is the course's final chapter.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.chapter_number >= self.total_chapters
    }
}

// ============================================================================
// Navigation and page map
// ============================================================================

/// Previous/next chapter links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// The preceding chapter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<NavLink>,
    /// The following chapter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NavLink>,
}

/// A link to another chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Target chapter id.
    pub id: String,
    /// Target chapter title.
    pub title: String,
}

/// The chapter's opening banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMap {
    /// What the student will be able to do after the chapter, in order.
    pub learning_objectives: Vec<String>,
    /// Chapters the student should know first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<ChapterReference>>,
    /// Free-text duration, e.g. "45 דקות".
    pub estimated_time: String,
}

/// A reference to another chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterReference {
    /// Referenced chapter id.
    pub chapter_id: String,
    /// Referenced chapter title.
    pub title: String,
    /// Why the reference matters here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A refresher for one prerequisite concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteItem {
    /// Concept name.
    pub concept: String,
    /// A few sentences recalling the concept.
    pub brief_review: String,
    /// How the concept is used in this chapter.
    pub why_needed: String,
}

// ============================================================================
// Free-text sections
// ============================================================================

/// Opening text of the chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Introduction {
    /// Main text.
    pub content: String,
    /// Motivation paragraph.
    pub why_it_matters: String,
    /// Optional link to everyday life.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_world_connection: Option<String>,
}

/// Everyday analogy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeaserAnalogy {
    /// Analogy text.
    pub content: String,
}

/// Informal explanation, optionally paired with its academic phrasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneBreak {
    /// Catchy first line.
    pub opener: String,
    /// Informal body.
    pub content: String,
    /// Heading of the academic counterpart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_title: Option<String>,
    /// Academic counterpart body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_content: Option<String>,
}

/// Plain-language recap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetSummary {
    /// Recap text.
    pub content: String,
}

/// Teaser for the next chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bridge {
    /// Title of the next chapter.
    pub next_chapter_title: String,
    /// Teaser text.
    pub content: String,
    /// Id or link of the next chapter.
    pub next_chapter: String,
}

// ============================================================================
// Formal definitions
// ============================================================================

/// Concepts and formulas of the chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalDefinitions {
    /// Concept definitions, in display order.
    pub concepts: Vec<Concept>,
    /// Formulas, in display order.
    #[serde(default)]
    pub formulas: Vec<Formula>,
}

/// A defined concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Concept name.
    pub title: String,
    /// Definition text; may contain inline math.
    pub content: String,
    /// Term → short definition, shown as hover tooltips inside `content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltips: Option<BTreeMap<String, String>>,
}

/// A formula with its variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formula {
    /// Formula name.
    pub title: String,
    /// LaTeX source.
    pub formula: String,
    /// Equivalent LaTeX form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_form: Option<String>,
    /// Symbol legend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<Variable>>,
    /// Typical value or rule of thumb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<String>,
}

/// One symbol of a formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// LaTeX symbol.
    pub symbol: String,
    /// Short name.
    pub name: String,
    /// Description.
    pub desc: String,
}

/// A frequent misconception and its correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonMistake {
    /// The wrong belief.
    pub mistake: String,
    /// The right one.
    pub correct: String,
    /// Explanation.
    pub why: String,
}

// ============================================================================
// Deep dive
// ============================================================================

/// Extended discussion, in one of the shapes authors use.
///
/// Variants are tried in declaration order; anything unrecognized is kept
/// as [`DeepDive::Opaque`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeepDive {
    /// A list of determinants, each with optional sub-items.
    Determinants {
        /// Heading override.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Intro text shown above the determinants.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// The determinants.
        determinants: Vec<Determinant>,
    },
    /// Titled sub-sections.
    Sections {
        /// Heading override.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// The sub-sections.
        sections: Vec<DeepDiveSection>,
    },
    /// A single block of text.
    Narrative {
        /// Heading override.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Body text.
        content: String,
    },
    /// Any other shape, passed through untouched.
    Opaque(Value),
}

impl DeepDive {
    /// Returns the heading override, if the variant carries one.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Determinants { title, .. }
            | Self::Sections { title, .. }
            | Self::Narrative { title, .. } => title.as_deref(),
            Self::Opaque(value) => value.get("title").and_then(Value::as_str),
        }
    }
}

/// One determinant in a [`DeepDive::Determinants`] block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Determinant {
    /// Determinant name.
    pub title: String,
    /// Explanation.
    pub content: String,
    /// Labelled details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<SubItem>>,
}

/// A label/value detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    /// Label.
    pub label: String,
    /// Value.
    pub value: String,
}

/// One sub-section of a [`DeepDive::Sections`] block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepDiveSection {
    /// Sub-section title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Worked example.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

// ============================================================================
// Interactive element
// ============================================================================

/// The chapter's interactive widget slot.
///
/// `id` is resolved against a caller-supplied registry at render time; the
/// payload is kept so that the widget can be configured from content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawInteractiveElement", into = "RawInteractiveElement")]
pub struct InteractiveElement {
    /// Registry key of the widget.
    pub id: String,
    /// Section heading.
    pub title: Option<String>,
    /// Widget payload.
    pub block: InteractiveBlock,
}

/// Payload of an interactive element, per known widget kind.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractiveBlock {
    /// Sort items into categories.
    ClassificationGame {
        /// Instructions shown above the game.
        instructions: String,
        /// Items to classify.
        items: Vec<ClassificationItem>,
    },
    /// A widget this crate knows nothing about.
    Opaque {
        /// Value of the `type` key, if any.
        kind: Option<String>,
        /// Remaining keys.
        config: Map<String, Value>,
    },
}

/// One item of a classification game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationItem {
    /// Item shown to the student.
    pub label: String,
    /// The category it belongs to.
    pub correct_category: String,
}

impl ClassificationItem {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("label".to_string(), Value::String(self.label.clone()));
        map.insert(
            "correctCategory".to_string(),
            Value::String(self.correct_category.clone()),
        );
        Value::Object(map)
    }
}

impl InteractiveBlock {
    /// Returns the widget kind as written in the `type` key.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::ClassificationGame { .. } => Some(CLASSIFICATION_GAME),
            Self::Opaque { kind, .. } => kind.as_deref(),
        }
    }
}

/// Wire shape of [`InteractiveElement`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawInteractiveElement {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Deserialize)]
struct ClassificationPayload {
    #[serde(default)]
    instructions: String,
    items: Vec<ClassificationItem>,
}

impl From<RawInteractiveElement> for InteractiveElement {
    fn from(raw: RawInteractiveElement) -> Self {
        let block = match raw.kind.as_deref() {
            Some(CLASSIFICATION_GAME) => {
                match ClassificationPayload::deserialize(&Value::Object(raw.rest.clone())) {
                    Ok(payload) => InteractiveBlock::ClassificationGame {
                        instructions: payload.instructions,
                        items: payload.items,
                    },
                    Err(_) => InteractiveBlock::Opaque {
                        kind: raw.kind,
                        config: raw.rest,
                    },
                }
            }
            _ => InteractiveBlock::Opaque {
                kind: raw.kind,
                config: raw.rest,
            },
        };

        Self {
            id: raw.id,
            title: raw.title,
            block,
        }
    }
}

impl From<InteractiveElement> for RawInteractiveElement {
    fn from(element: InteractiveElement) -> Self {
        let (kind, rest) = match element.block {
            InteractiveBlock::ClassificationGame {
                instructions,
                items,
            } => {
                let mut rest = Map::new();
                rest.insert("instructions".to_string(), Value::String(instructions));
                rest.insert(
                    "items".to_string(),
                    Value::Array(items.iter().map(ClassificationItem::to_value).collect()),
                );
                (Some(CLASSIFICATION_GAME.to_string()), rest)
            }
            InteractiveBlock::Opaque { kind, config } => (kind, config),
        };

        Self {
            id: element.id,
            title: element.title,
            kind,
            rest,
        }
    }
}

// ============================================================================
// Checkpoint
// ============================================================================

/// Discriminator of a checkpoint item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckpointKind {
    /// Pick one of several options.
    #[serde(alias = "multiple-choice")]
    MultipleChoice,
    /// Judge a statement true or false.
    #[serde(alias = "true-false")]
    TrueFalse,
}

/// A checkpoint quiz item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCheckpointItem", into = "RawCheckpointItem")]
pub enum CheckpointItem {
    /// Multiple-choice question.
    MultipleChoice(MultipleChoiceQuestion),
    /// True/false statement.
    TrueFalse(TrueFalseQuestion),
}

/// A multiple-choice checkpoint question.
///
/// `correct_index` is always a valid index into `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoiceQuestion {
    /// Stable id, if authored.
    pub id: Option<String>,
    /// Question text.
    pub question: String,
    /// Answer options.
    pub options: Vec<String>,
    /// Index of the right option.
    pub correct_index: usize,
    /// Shown after answering.
    pub explanation: String,
}

/// A true/false checkpoint statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrueFalseQuestion {
    /// Stable id, if authored.
    pub id: Option<String>,
    /// Statement text.
    pub question: String,
    /// Whether the statement is true.
    pub correct: bool,
    /// Shown after answering.
    pub explanation: String,
}

impl CheckpointItem {
    /// Returns the item's discriminator.
    #[must_use]
    pub const fn kind(&self) -> CheckpointKind {
        match self {
            Self::MultipleChoice(_) => CheckpointKind::MultipleChoice,
            Self::TrueFalse(_) => CheckpointKind::TrueFalse,
        }
    }

    /// Returns the question or statement text.
    #[must_use]
    pub fn question(&self) -> &str {
        match self {
            Self::MultipleChoice(q) => &q.question,
            Self::TrueFalse(q) => &q.question,
        }
    }

    /// Returns the explanation shown after answering.
    #[must_use]
    pub fn explanation(&self) -> &str {
        match self {
            Self::MultipleChoice(q) => &q.explanation,
            Self::TrueFalse(q) => &q.explanation,
        }
    }

    /// Returns the text of the right answer.
    ///
    /// True/false items answer with the Hebrew words for "true" and "false".
    #[must_use]
    pub fn answer_text(&self) -> &str {
        match self {
            Self::MultipleChoice(q) => q
                .options
                .get(q.correct_index)
                .map_or("", String::as_str),
            Self::TrueFalse(q) if q.correct => "נכון",
            Self::TrueFalse(_) => "לא נכון",
        }
    }
}

/// Wire shape of [`CheckpointItem`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCheckpointItem {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<CheckpointKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    question: Option<String>,
    #[serde(default, skip_serializing)]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct: Option<bool>,
    explanation: String,
}

impl RawCheckpointItem {
    /// Infers the kind when the `type` key is absent.
    fn resolved_kind(&self) -> CheckpointKind {
        self.kind.unwrap_or(match (self.correct, self.correct_index) {
            (Some(_), None) => CheckpointKind::TrueFalse,
            _ => CheckpointKind::MultipleChoice,
        })
    }
}

impl TryFrom<RawCheckpointItem> for CheckpointItem {
    type Error = String;

    fn try_from(raw: RawCheckpointItem) -> std::result::Result<Self, Self::Error> {
        let kind = raw.resolved_kind();
        let question = raw
            .question
            .or(raw.text)
            .ok_or_else(|| "checkpoint item needs 'question' or 'text'".to_string())?;

        match kind {
            CheckpointKind::MultipleChoice => {
                let options = raw
                    .options
                    .ok_or_else(|| "multiple-choice item needs 'options'".to_string())?;
                let correct_index = raw
                    .correct_index
                    .ok_or_else(|| "multiple-choice item needs 'correctIndex'".to_string())?;
                if correct_index >= options.len() {
                    return Err(format!(
                        "correctIndex {correct_index} is out of range for {} options",
                        options.len()
                    ));
                }
                Ok(Self::MultipleChoice(MultipleChoiceQuestion {
                    id: raw.id,
                    question,
                    options,
                    correct_index,
                    explanation: raw.explanation,
                }))
            }
            CheckpointKind::TrueFalse => {
                let correct = raw
                    .correct
                    .ok_or_else(|| "true/false item needs boolean 'correct'".to_string())?;
                Ok(Self::TrueFalse(TrueFalseQuestion {
                    id: raw.id,
                    question,
                    correct,
                    explanation: raw.explanation,
                }))
            }
        }
    }
}

impl From<CheckpointItem> for RawCheckpointItem {
    fn from(item: CheckpointItem) -> Self {
        match item {
            CheckpointItem::MultipleChoice(q) => Self {
                kind: Some(CheckpointKind::MultipleChoice),
                id: q.id,
                question: Some(q.question),
                text: None,
                options: Some(q.options),
                correct_index: Some(q.correct_index),
                correct: None,
                explanation: q.explanation,
            },
            CheckpointItem::TrueFalse(q) => Self {
                kind: Some(CheckpointKind::TrueFalse),
                id: q.id,
                question: Some(q.question),
                text: None,
                options: None,
                correct_index: None,
                correct: Some(q.correct),
                explanation: q.explanation,
            },
        }
    }
}

// ============================================================================
// Exercises, reference, trivia
// ============================================================================

/// A practice exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndependentExercise {
    /// Difficulty ordinal, 1 (easy) to 5 (hard) by convention.
    pub difficulty: u32,
    /// Exercise text.
    pub question: String,
    /// Answer options for exam-style exercises.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Hint.
    pub hint: String,
    /// Full answer.
    pub answer: String,
    /// Whether the exercise is phrased like an exam question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exam_style: Option<bool>,
}

/// Formula and definition cheat sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReference {
    /// Formulas.
    pub formulas: Vec<ReferenceFormula>,
    /// Definitions.
    pub definitions: Vec<ReferenceDefinition>,
}

/// A formula on the cheat sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFormula {
    /// Formula name.
    pub name: String,
    /// LaTeX source.
    pub formula: String,
    /// Short label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Small print below the formula.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

/// A definition on the cheat sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDefinition {
    /// Term.
    pub term: String,
    /// Definition.
    pub definition: String,
}

/// A "did you know" fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaItem {
    /// The fact.
    pub fact: String,
    /// Category, e.g. "historical".
    #[serde(rename = "type")]
    pub kind: String,
    /// Citation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checkpoint_multiple_choice_with_type() {
        let item: CheckpointItem = serde_json::from_value(json!({
            "type": "multipleChoice",
            "question": "מה זה נכס?",
            "options": ["משאב", "חוב"],
            "correctIndex": 0,
            "explanation": "נכס הוא משאב"
        }))
        .unwrap();

        assert_eq!(item.kind(), CheckpointKind::MultipleChoice);
        assert_eq!(item.question(), "מה זה נכס?");
        assert_eq!(item.answer_text(), "משאב");
    }

    #[test]
    fn test_checkpoint_text_fallback_and_inferred_true_false() {
        let item: CheckpointItem = serde_json::from_value(json!({
            "text": "הון עצמי הוא התחייבות",
            "correct": false,
            "explanation": "הון הוא זכות הבעלים"
        }))
        .unwrap();

        assert_eq!(item.kind(), CheckpointKind::TrueFalse);
        assert_eq!(item.question(), "הון עצמי הוא התחייבות");
        assert_eq!(item.answer_text(), "לא נכון");
    }

    #[test]
    fn test_checkpoint_inferred_multiple_choice() {
        let item: CheckpointItem = serde_json::from_value(json!({
            "question": "q",
            "options": ["a", "b", "c"],
            "correctIndex": 2,
            "explanation": "e"
        }))
        .unwrap();
        assert_eq!(item.kind(), CheckpointKind::MultipleChoice);
    }

    #[test]
    fn test_checkpoint_kebab_alias() {
        let item: CheckpointItem = serde_json::from_value(json!({
            "type": "true-false",
            "question": "q",
            "correct": true,
            "explanation": "e"
        }))
        .unwrap();
        assert_eq!(item.kind(), CheckpointKind::TrueFalse);
    }

    #[test]
    fn test_checkpoint_rejects_out_of_range_index() {
        let result: Result<CheckpointItem, _> = serde_json::from_value(json!({
            "type": "multipleChoice",
            "question": "q",
            "options": ["a"],
            "correctIndex": 1,
            "explanation": "e"
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("out of range"), "unexpected error: {err}");
    }

    #[test]
    fn test_checkpoint_serializes_canonical_shape() {
        let item: CheckpointItem = serde_json::from_value(json!({
            "text": "q",
            "options": ["a", "b"],
            "correctIndex": 1,
            "explanation": "e"
        }))
        .unwrap();

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "multipleChoice");
        assert_eq!(value["question"], "q");
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_deep_dive_variants() {
        let narrative: DeepDive =
            serde_json::from_value(json!({ "title": "t", "content": "c" })).unwrap();
        assert!(matches!(narrative, DeepDive::Narrative { .. }));
        assert_eq!(narrative.title(), Some("t"));

        let determinants: DeepDive = serde_json::from_value(json!({
            "content": "intro",
            "determinants": [
                { "title": "מחיר", "content": "c", "subItems": [{ "label": "l", "value": "v" }] }
            ]
        }))
        .unwrap();
        assert!(matches!(determinants, DeepDive::Determinants { ref determinants, .. } if determinants.len() == 1));

        let sections: DeepDive = serde_json::from_value(json!({
            "title": "t",
            "sections": [{ "title": "s", "content": "c" }]
        }))
        .unwrap();
        assert!(matches!(sections, DeepDive::Sections { .. }));

        let opaque: DeepDive =
            serde_json::from_value(json!({ "examAppearance": ["2023"] })).unwrap();
        assert!(matches!(opaque, DeepDive::Opaque(_)));
    }

    #[test]
    fn test_interactive_classification_game() {
        let element: InteractiveElement = serde_json::from_value(json!({
            "id": "goods-sorter",
            "type": "classification-game",
            "title": "סיווג מוצרים",
            "instructions": "סווגו",
            "items": [{ "label": "לחם", "correctCategory": "מוצר נורמלי" }]
        }))
        .unwrap();

        assert_eq!(element.id, "goods-sorter");
        assert_eq!(element.block.kind(), Some(CLASSIFICATION_GAME));
        assert!(matches!(
            element.block,
            InteractiveBlock::ClassificationGame { ref items, .. } if items.len() == 1
        ));
    }

    #[test]
    fn test_interactive_unknown_kind_is_opaque() {
        let element: InteractiveElement = serde_json::from_value(json!({
            "id": "arcade-x",
            "type": "space-invaders",
            "level": 3
        }))
        .unwrap();

        assert_eq!(element.block.kind(), Some("space-invaders"));
        assert!(matches!(
            &element.block,
            InteractiveBlock::Opaque { config, .. } if config.get("level") == Some(&json!(3))
        ));
    }

    #[test]
    fn test_interactive_malformed_game_is_opaque() {
        let element: InteractiveElement = serde_json::from_value(json!({
            "id": "broken",
            "type": "classification-game"
        }))
        .unwrap();
        assert!(matches!(element.block, InteractiveBlock::Opaque { .. }));
    }

    #[test]
    fn test_interactive_round_trip_keeps_payload() {
        let raw = json!({
            "id": "goods-sorter",
            "type": "classification-game",
            "instructions": "סווגו",
            "items": [{ "label": "לחם", "correctCategory": "נורמלי" }]
        });
        let element: InteractiveElement = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&element).unwrap(), raw);
    }
}
