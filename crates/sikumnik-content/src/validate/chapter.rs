//! Chapter document rules.

use serde_json::{Map, Value};

use super::{contains_hebrew, index, join, Walker};
use crate::error::{JsonKind, SchemaError};
use crate::schema::CLASSIFICATION_GAME;

const TOP_LEVEL_FIELDS: &[&str] = &[
    "id",
    "title",
    "course",
    "chapterNumber",
    "totalChapters",
    "navigation",
    "pageMap",
    "prerequisiteReview",
    "introduction",
    "teaserAnalogy",
    "formalDefinitions",
    "toneBreak",
    "deepDive",
    "commonMistakes",
    "interactiveElement",
    "checkpoint",
    "streetSummary",
    "guidedExercises",
    "independentExercises",
    "quickReference",
    "trivia",
    "bridge",
];

const MAX_DIFFICULTY: u32 = 5;

type Object = Map<String, Value>;

pub(super) fn check_chapter(w: &mut Walker, raw: &Value, strict_hebrew: bool) {
    let Some(doc) = w.object(raw, "$") else {
        return;
    };

    w.required_str(doc, "", "id");
    let title = w.required_str(doc, "", "title");
    if doc.contains_key("course") {
        w.optional_str(doc, "", "course");
    } else {
        w.warn("course", "recommended field is missing");
    }

    let number = w.required_uint(doc, "", "chapterNumber");
    let total = w.required_uint(doc, "", "totalChapters");
    if let (Some(number), Some(total)) = (number, total) {
        if number == 0 || number > total {
            w.invalid(
                "chapterNumber",
                format!("must be between 1 and totalChapters ({total}), got {number}"),
            );
        }
    }

    match w.optional_object(doc, "", "navigation") {
        Some(nav) => check_navigation(w, nav),
        None if !doc.contains_key("navigation") => {
            w.warn("navigation", "recommended field is missing");
        }
        None => {}
    }

    if let Some(page_map) = w.required_object(doc, "", "pageMap") {
        check_page_map(w, page_map);
    }
    if let Some(items) = w.optional_array(doc, "", "prerequisiteReview") {
        w.each_object(items, "prerequisiteReview", |w, item, path| {
            w.required_str(item, path, "concept");
            w.required_str(item, path, "briefReview");
            w.required_str(item, path, "whyNeeded");
        });
    }

    let intro = w.required_object(doc, "", "introduction").and_then(|intro| {
        w.required_str(intro, "introduction", "whyItMatters");
        w.optional_str(intro, "introduction", "realWorldConnection");
        w.required_str(intro, "introduction", "content")
    });

    if let Some(teaser) = w.required_object(doc, "", "teaserAnalogy") {
        w.required_str(teaser, "teaserAnalogy", "content");
    }
    if let Some(defs) = w.required_object(doc, "", "formalDefinitions") {
        check_formal_definitions(w, defs);
    }
    if let Some(tone) = w.required_object(doc, "", "toneBreak") {
        w.required_str(tone, "toneBreak", "opener");
        w.required_str(tone, "toneBreak", "content");
        w.optional_str(tone, "toneBreak", "academicTitle");
        w.optional_str(tone, "toneBreak", "academicContent");
    }
    if let Some(deep_dive) = w.optional_object(doc, "", "deepDive") {
        check_deep_dive(w, deep_dive);
    }
    if let Some(mistakes) = w.required_array(doc, "", "commonMistakes") {
        w.each_object(mistakes, "commonMistakes", |w, item, path| {
            w.required_str(item, path, "mistake");
            w.required_str(item, path, "correct");
            w.required_str(item, path, "why");
        });
    }
    if let Some(element) = w.optional_object(doc, "", "interactiveElement") {
        check_interactive(w, element);
    }
    if let Some(items) = w.required_array(doc, "", "checkpoint") {
        w.each_object(items, "checkpoint", check_checkpoint_item);
    }
    if let Some(summary) = w.required_object(doc, "", "streetSummary") {
        w.required_str(summary, "streetSummary", "content");
    }
    if doc.get("guidedExercises").map_or(true, Value::is_null) {
        w.error(SchemaError::missing("guidedExercises"));
    }
    if let Some(exercises) = w.required_array(doc, "", "independentExercises") {
        w.each_object(exercises, "independentExercises", check_exercise);
    }
    if let Some(reference) = w.required_object(doc, "", "quickReference") {
        check_quick_reference(w, reference);
    }
    if let Some(trivia) = w.required_array(doc, "", "trivia") {
        w.each_object(trivia, "trivia", |w, item, path| {
            w.required_str(item, path, "fact");
            w.required_str(item, path, "type");
            w.optional_str(item, path, "source");
        });
    }
    if let Some(bridge) = w.required_object(doc, "", "bridge") {
        w.required_str(bridge, "bridge", "nextChapterTitle");
        w.required_str(bridge, "bridge", "content");
        w.required_str(bridge, "bridge", "nextChapter");
    }

    w.unknown_keys(doc, "", TOP_LEVEL_FIELDS);

    if strict_hebrew {
        if let Some(title) = title {
            if !contains_hebrew(title) {
                w.warn("title", "contains no Hebrew text");
            }
        }
        if let Some(content) = intro {
            if !contains_hebrew(content) {
                w.warn("introduction.content", "contains no Hebrew text");
            }
        }
    }
}

fn check_navigation(w: &mut Walker, nav: &Object) {
    for key in ["previous", "next"] {
        if let Some(link) = w.optional_object(nav, "navigation", key) {
            let path = join("navigation", key);
            w.required_str(link, &path, "id");
            w.required_str(link, &path, "title");
        }
    }
}

fn check_page_map(w: &mut Walker, page_map: &Object) {
    if let Some(objectives) = w.required_array(page_map, "pageMap", "learningObjectives") {
        w.string_items(objectives, "pageMap.learningObjectives");
    }
    w.required_str(page_map, "pageMap", "estimatedTime");
    if let Some(prereqs) = w.optional_array(page_map, "pageMap", "prerequisites") {
        w.each_object(prereqs, "pageMap.prerequisites", |w, item, path| {
            w.required_str(item, path, "chapterId");
            w.required_str(item, path, "title");
            w.optional_str(item, path, "description");
        });
    }
}

fn check_formal_definitions(w: &mut Walker, defs: &Object) {
    if let Some(concepts) = w.required_array(defs, "formalDefinitions", "concepts") {
        w.each_object(concepts, "formalDefinitions.concepts", check_concept);
    }
    if let Some(formulas) = w.optional_array(defs, "formalDefinitions", "formulas") {
        w.each_object(formulas, "formalDefinitions.formulas", |w, item, path| {
            w.required_str(item, path, "title");
            w.required_str(item, path, "formula");
            w.optional_str(item, path, "alternativeForm");
            w.optional_str(item, path, "benchmark");
            if let Some(vars) = w.optional_array(item, path, "variables") {
                w.each_object(vars, &join(path, "variables"), |w, var, var_path| {
                    w.required_str(var, var_path, "symbol");
                    w.required_str(var, var_path, "name");
                    w.required_str(var, var_path, "desc");
                });
            }
        });
    }
}

fn check_concept(w: &mut Walker, concept: &Object, path: &str) {
    w.required_str(concept, path, "title");
    let content = w.required_str(concept, path, "content");
    let Some(tooltips) = w.optional_object(concept, path, "tooltips") else {
        return;
    };

    let tooltips_path = join(path, "tooltips");
    for (term, definition) in tooltips {
        let term_path = join(&tooltips_path, term);
        if !w.expect_kind(definition, &term_path, JsonKind::String) {
            continue;
        }
        if let Some(content) = content {
            if !content.contains(term.as_str()) {
                w.invalid(term_path, "tooltip term does not appear in the concept content");
            }
        }
    }
}

fn check_deep_dive(w: &mut Walker, deep_dive: &Object) {
    w.optional_str(deep_dive, "deepDive", "title");
    w.optional_str(deep_dive, "deepDive", "content");
    if let Some(determinants) = w.optional_array(deep_dive, "deepDive", "determinants") {
        w.each_object(determinants, "deepDive.determinants", |w, item, path| {
            w.required_str(item, path, "title");
            w.required_str(item, path, "content");
            if let Some(sub_items) = w.optional_array(item, path, "subItems") {
                w.each_object(sub_items, &join(path, "subItems"), |w, sub, sub_path| {
                    w.required_str(sub, sub_path, "label");
                    w.required_str(sub, sub_path, "value");
                });
            }
        });
    }
    if let Some(sections) = w.optional_array(deep_dive, "deepDive", "sections") {
        w.each_object(sections, "deepDive.sections", |w, item, path| {
            w.required_str(item, path, "title");
            w.required_str(item, path, "content");
            w.optional_str(item, path, "example");
        });
    }
}

fn check_interactive(w: &mut Walker, element: &Object) {
    const PATH: &str = "interactiveElement";

    w.required_str(element, PATH, "id");
    w.optional_str(element, PATH, "title");
    if w.optional_str(element, PATH, "type") != Some(CLASSIFICATION_GAME) {
        return;
    }

    // A malformed game still loads as an opaque block.
    match element.get("items").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {
            for (i, item) in items.iter().enumerate() {
                if !is_classification_item(item) {
                    w.warn(
                        index(&join(PATH, "items"), i),
                        "classification item needs string 'label' and 'correctCategory'",
                    );
                }
            }
        }
        _ => w.warn(join(PATH, "items"), "classification game has no items"),
    }
}

fn is_classification_item(item: &Value) -> bool {
    ["label", "correctCategory"]
        .iter()
        .all(|key| item.get(key).is_some_and(Value::is_string))
}

fn check_checkpoint_item(w: &mut Walker, item: &Object, path: &str) {
    let kind = w.optional_str(item, path, "type");
    let question = w.optional_str(item, path, "question");
    let text = w.optional_str(item, path, "text");
    if question.is_none() && text.is_none() {
        w.error(SchemaError::missing(join(path, "question")));
    }
    w.optional_str(item, path, "id");
    w.required_str(item, path, "explanation");

    let is_true_false = match kind {
        Some("trueFalse" | "true-false") => true,
        Some("multipleChoice" | "multiple-choice") => false,
        Some(other) => {
            w.invalid(join(path, "type"), format!("unknown checkpoint type '{other}'"));
            return;
        }
        None => item.get("correct").is_some_and(Value::is_boolean) && !item.contains_key("correctIndex"),
    };

    if is_true_false {
        if item.get("correct").map_or(true, Value::is_null) {
            w.error(SchemaError::missing(join(path, "correct")));
        } else {
            w.optional_bool(item, path, "correct");
        }
        return;
    }

    let options = w
        .required_array(item, path, "options")
        .map(|options| w.string_items(options, &join(path, "options")).len());
    let correct_index = w.required_uint(item, path, "correctIndex");

    if let Some(count) = options {
        if count == 0 {
            w.invalid(join(path, "options"), "must contain at least one option");
            return;
        }
        if count < 2 {
            w.warn(join(path, "options"), "fewer than 2 options");
        }
        if let Some(correct_index) = correct_index {
            if correct_index as usize >= count {
                w.invalid(
                    join(path, "correctIndex"),
                    format!("{correct_index} is out of range for {count} options"),
                );
            }
        }
    }
}

fn check_exercise(w: &mut Walker, exercise: &Object, path: &str) {
    if let Some(difficulty) = w.required_uint(exercise, path, "difficulty") {
        if !(1..=MAX_DIFFICULTY).contains(&difficulty) {
            w.warn(
                join(path, "difficulty"),
                format!("difficulty {difficulty} is outside 1-{MAX_DIFFICULTY}"),
            );
        }
    }
    w.required_str(exercise, path, "question");
    w.required_str(exercise, path, "hint");
    w.required_str(exercise, path, "answer");
    w.optional_bool(exercise, path, "isExamStyle");
    if let Some(options) = w.optional_array(exercise, path, "options") {
        w.string_items(options, &join(path, "options"));
    }
}

fn check_quick_reference(w: &mut Walker, reference: &Object) {
    if let Some(formulas) = w.required_array(reference, "quickReference", "formulas") {
        w.each_object(formulas, "quickReference.formulas", |w, item, path| {
            w.required_str(item, path, "name");
            w.required_str(item, path, "formula");
            w.optional_str(item, path, "label");
            w.optional_str(item, path, "subtext");
        });
    }
    if let Some(definitions) = w.required_array(reference, "quickReference", "definitions") {
        w.each_object(definitions, "quickReference.definitions", |w, item, path| {
            w.required_str(item, path, "term");
            w.required_str(item, path, "definition");
        });
    }
}
