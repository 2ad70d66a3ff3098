//! Shared chapter fixtures for unit tests.

use serde_json::{json, Value};

/// A chapter with only the required fields.
pub fn minimal_chapter() -> Value {
    json!({
        "id": "chapter-1",
        "title": "מבוא לחשבונאות",
        "chapterNumber": 1,
        "totalChapters": 10,
        "pageMap": {
            "learningObjectives": ["להבין מהו מאזן"],
            "estimatedTime": "30 דקות"
        },
        "introduction": { "content": "ברוכים הבאים", "whyItMatters": "כי" },
        "teaserAnalogy": { "content": "כמו ארנק" },
        "formalDefinitions": {
            "concepts": [{ "title": "נכס", "content": "משאב בשליטת הישות" }]
        },
        "toneBreak": { "opener": "רגע", "content": "בקיצור" },
        "commonMistakes": [],
        "checkpoint": [],
        "streetSummary": { "content": "סיכום" },
        "guidedExercises": [],
        "independentExercises": [],
        "quickReference": { "formulas": [], "definitions": [] },
        "trivia": [],
        "bridge": {
            "nextChapterTitle": "פרק 2",
            "content": "בפרק הבא",
            "nextChapter": "chapter-2"
        }
    })
}

/// A chapter that fills every optional section.
pub fn rich_chapter() -> Value {
    let mut raw = minimal_chapter();
    let extra = json!({
        "course": "חשבונאות פיננסית",
        "navigation": {
            "next": { "id": "chapter-2", "title": "המאזן" }
        },
        "prerequisiteReview": [{
            "concept": "משוואת המאזן",
            "briefReview": "נכסים שווים להתחייבויות ועוד הון",
            "whyNeeded": "כל פעולה משנה את שני צדי המשוואה"
        }],
        "formalDefinitions": {
            "concepts": [{
                "title": "נכס",
                "content": "משאב בשליטת הישות, כמו $A$ במשוואה",
                "tooltips": { "משאב": "דבר בעל ערך כלכלי" }
            }],
            "formulas": [{
                "title": "משוואת המאזן",
                "formula": "A = L + E",
                "variables": [{ "symbol": "A", "name": "נכסים", "desc": "סך הנכסים" }]
            }]
        },
        "deepDive": {
            "title": "מה קובע שווי נכס",
            "determinants": [{
                "title": "עלות היסטורית",
                "content": "המחיר ששולם",
                "subItems": [{ "label": "דוגמה", "value": "מכונה" }]
            }]
        },
        "commonMistakes": [{
            "mistake": "הון הוא כסף בקופה",
            "correct": "הון הוא זכות הבעלים",
            "why": "הון הוא צד המימון"
        }],
        "interactiveElement": {
            "id": "goods-sorter",
            "type": "classification-game",
            "title": "סיווג סעיפים",
            "instructions": "גררו כל סעיף לקטגוריה",
            "items": [
                { "label": "מלאי", "correctCategory": "נכסים" },
                { "label": "ספקים", "correctCategory": "התחייבויות" }
            ]
        },
        "checkpoint": [
            {
                "type": "multipleChoice",
                "question": "מה מהבאים הוא נכס?",
                "options": ["מלאי", "ספקים"],
                "correctIndex": 0,
                "explanation": "מלאי הוא משאב"
            },
            {
                "type": "trueFalse",
                "question": "הון הוא התחייבות לבעלים",
                "correct": false,
                "explanation": "הון הוא זכות שיורית"
            }
        ],
        "guidedExercises": [{ "title": "תרגיל 1", "steps": ["צעד"] }],
        "independentExercises": [{
            "difficulty": 2,
            "question": "חשבו את ההון",
            "hint": "נכסים פחות התחייבויות",
            "answer": "100"
        }],
        "quickReference": {
            "formulas": [{ "name": "מאזן", "formula": "A = L + E" }],
            "definitions": [{ "term": "נכס", "definition": "משאב" }]
        },
        "trivia": [{ "fact": "שיטת החשבונאות הכפולה תועדה ב-1494", "type": "historical" }]
    });

    if let (Some(base), Value::Object(extra)) = (raw.as_object_mut(), extra) {
        base.extend(extra);
    }
    raw
}
