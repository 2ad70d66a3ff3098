//! Exam documents and scoring.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Share of a question's points earned when the hint was revealed.
pub const HINT_CREDIT: f64 = 0.8;

/// A practice exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDocument {
    /// Exam identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Course the exam belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    /// Percentage needed to pass, 0 to 100.
    pub passing_score: u32,
    /// Time limit, if the exam is timed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    /// Questions in display order.
    pub questions: Vec<ExamQuestion>,
}

/// Question type tag. Only multiple choice exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamQuestionKind {
    /// Pick one of several options.
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
}

/// One exam question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestion {
    /// Question identifier, unique within the exam.
    pub id: String,
    /// Display number.
    pub number: u32,
    /// Question type.
    #[serde(rename = "type")]
    pub kind: ExamQuestionKind,
    /// Question text.
    pub question: String,
    /// Points awarded for a correct answer.
    pub points: f64,
    /// Answer options.
    pub options: Vec<String>,
    /// Index of the right option.
    pub correct_index: usize,
    /// Hint the student may reveal at a cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Explanations for the right and wrong options.
    pub reasoning: Reasoning,
}

/// Post-answer explanations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reasoning {
    /// Why the right option is right.
    pub correct: String,
    /// Why each wrong option is wrong, keyed by the option index as a string.
    pub wrong: BTreeMap<String, String>,
}

impl ExamQuestion {
    /// Returns the explanation to show after the student picked `choice`.
    #[must_use]
    pub fn feedback_for(&self, choice: usize) -> Option<&str> {
        if choice == self.correct_index {
            Some(&self.reasoning.correct)
        } else {
            self.reasoning.wrong.get(&choice.to_string()).map(String::as_str)
        }
    }

    fn earned(&self, choice: Option<usize>, hint_used: bool) -> f64 {
        match choice {
            Some(index) if index == self.correct_index && hint_used => self.points * HINT_CREDIT,
            Some(index) if index == self.correct_index => self.points,
            _ => 0.0,
        }
    }
}

/// A student's submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnswers {
    /// Question id → selected option index.
    #[serde(default)]
    pub answers: HashMap<String, usize>,
    /// Ids of the questions whose hint was revealed.
    #[serde(default)]
    pub hints_used: HashSet<String>,
}

impl ExamAnswers {
    /// Records an answer.
    #[must_use]
    pub fn answer(mut self, question_id: impl Into<String>, choice: usize) -> Self {
        self.answers.insert(question_id.into(), choice);
        self
    }

    /// Records that a hint was revealed.
    #[must_use]
    pub fn with_hint(mut self, question_id: impl Into<String>) -> Self {
        self.hints_used.insert(question_id.into());
        self
    }
}

/// Outcome for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    /// Question id.
    pub question_id: String,
    /// Option the student picked.
    pub selected: Option<usize>,
    /// Whether the pick was right.
    pub correct: bool,
    /// Whether the hint was revealed.
    pub hint_used: bool,
    /// Points earned, after the hint penalty.
    pub points_earned: f64,
    /// Explanation for the pick.
    pub feedback: Option<String>,
}

/// Outcome of a whole exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamScore {
    /// Sum of earned points.
    pub earned_points: f64,
    /// Sum of all question points.
    pub total_points: f64,
    /// `earned / total * 100`, rounded.
    pub percentage: u32,
    /// Whether `percentage` reaches the passing score.
    pub passed: bool,
    /// Number of right answers.
    pub correct_count: usize,
    /// Number of answered questions.
    pub answered_count: usize,
    /// Per-question breakdown, in question order.
    pub results: Vec<QuestionResult>,
}

impl ExamDocument {
    /// Returns the sum of all question points.
    #[must_use]
    pub fn total_points(&self) -> f64 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Scores a submission.
    ///
    /// Right answers earn the question's points, scaled by [`HINT_CREDIT`]
    /// when the hint was revealed. Answers to unknown question ids are
    /// ignored. An exam worth zero points scores 0%.
    #[must_use]
    pub fn score(&self, submission: &ExamAnswers) -> ExamScore {
        let results: Vec<QuestionResult> = self
            .questions
            .iter()
            .map(|question| {
                let selected = submission.answers.get(&question.id).copied();
                let hint_used = submission.hints_used.contains(&question.id);
                let points_earned = question.earned(selected, hint_used);
                QuestionResult {
                    question_id: question.id.clone(),
                    selected,
                    correct: selected == Some(question.correct_index),
                    hint_used,
                    points_earned,
                    feedback: selected
                        .and_then(|choice| question.feedback_for(choice))
                        .map(str::to_string),
                }
            })
            .collect();

        let earned_points: f64 = results.iter().map(|r| r.points_earned).sum();
        let total_points = self.total_points();
        let percentage = percentage(earned_points, total_points);

        ExamScore {
            earned_points,
            total_points,
            percentage,
            passed: percentage >= self.passing_score,
            correct_count: results.iter().filter(|r| r.correct).count(),
            answered_count: results.iter().filter(|r| r.selected.is_some()).count(),
            results,
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentage(earned: f64, total: f64) -> u32 {
    if total <= 0.0 {
        return 0;
    }
    (earned / total * 100.0).round().clamp(0.0, 100.0) as u32
}
