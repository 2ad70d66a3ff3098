//! Exam document rules.

use std::collections::HashSet;

use serde_json::Value;

use super::{join, Walker};
use crate::error::JsonKind;

pub(super) fn check_exam(w: &mut Walker, raw: &Value) {
    let Some(doc) = w.object(raw, "$") else {
        return;
    };

    w.required_str(doc, "", "id");
    w.required_str(doc, "", "title");
    w.optional_str(doc, "", "courseId");
    w.optional_uint(doc, "", "timeLimitMinutes");
    if let Some(score) = w.required_uint(doc, "", "passingScore") {
        if score > 100 {
            w.invalid("passingScore", format!("must be between 0 and 100, got {score}"));
        }
    }
    if let Some(total) = w.optional_uint(doc, "", "totalQuestions") {
        let actual = doc.get("questions").and_then(Value::as_array).map(Vec::len);
        if actual.is_some_and(|n| n != total as usize) {
            w.warn("totalQuestions", "does not match the number of questions");
        }
    }

    let Some(questions) = w.required_array(doc, "", "questions") else {
        return;
    };

    let mut seen = HashSet::new();
    w.each_object(questions, "questions", |w, q, path| {
        if let Some(id) = w.required_str(q, path, "id") {
            if !seen.insert(id) {
                w.invalid(join(path, "id"), format!("duplicate question id '{id}'"));
            }
        }
        w.required_uint(q, path, "number");
        match w.required_str(q, path, "type") {
            Some("multiple-choice") | None => {}
            Some(other) => w.invalid(join(path, "type"), format!("unknown question type '{other}'")),
        }
        w.required_str(q, path, "question");
        w.optional_str(q, path, "hint");

        if let Some(points) = w.required(q, path, "points", JsonKind::Number).and_then(Value::as_f64) {
            if points < 0.0 {
                w.invalid(join(path, "points"), "must not be negative");
            }
        }

        let count = w
            .required_array(q, path, "options")
            .map(|options| w.string_items(options, &join(path, "options")).len());
        let correct_index = w.required_uint(q, path, "correctIndex");
        if let (Some(count), Some(correct_index)) = (count, correct_index) {
            if correct_index as usize >= count {
                w.invalid(
                    join(path, "correctIndex"),
                    format!("{correct_index} is out of range for {count} options"),
                );
            }
        }

        if let Some(reasoning) = w.required_object(q, path, "reasoning") {
            let reasoning_path = join(path, "reasoning");
            w.required_str(reasoning, &reasoning_path, "correct");
            if let Some(wrong) = w.required_object(reasoning, &reasoning_path, "wrong") {
                let wrong_path = join(&reasoning_path, "wrong");
                let mut covered = HashSet::new();
                for (key, text) in wrong {
                    let key_path = join(&wrong_path, key);
                    if !w.expect_kind(text, &key_path, JsonKind::String) {
                        continue;
                    }
                    match key.parse::<usize>() {
                        Ok(i) if correct_index.is_some_and(|c| c as usize == i) => {
                            w.invalid(key_path, "explains the correct option");
                        }
                        Ok(i) if count.map_or(true, |n| i < n) => {
                            covered.insert(i);
                        }
                        _ => w.warn(key_path, "key is not an option index"),
                    }
                }
                if let (Some(count), Some(correct_index)) = (count, correct_index) {
                    for option in (0..count).filter(|&i| i != correct_index as usize) {
                        if !covered.contains(&option) {
                            w.invalid(
                                wrong_path.clone(),
                                format!("missing explanation for option {option}"),
                            );
                        }
                    }
                }
            }
        }
    });

    if questions.is_empty() {
        w.warn("questions", "exam has no questions");
    }
}
