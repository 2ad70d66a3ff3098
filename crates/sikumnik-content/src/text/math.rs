//! Splitting display text into plain and math spans.

use std::iter::FusedIterator;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// `$...$` on a single line, shortest match.
static INLINE_MATH: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\$([^\n]*?)\$").ok());

/// One piece of segmented text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Span<'a> {
    /// Plain text; may contain inline HTML.
    Text {
        /// The text.
        html: &'a str,
    },
    /// Math rendered inline.
    InlineMath {
        /// LaTeX source, without delimiters.
        expr: &'a str,
    },
    /// Math rendered as a display block.
    BlockMath {
        /// LaTeX source, without delimiters.
        expr: &'a str,
    },
}

impl<'a> Span<'a> {
    /// Returns the span's content without delimiters.
    #[must_use]
    pub const fn content(&self) -> &'a str {
        match self {
            Self::Text { html } => html,
            Self::InlineMath { expr } | Self::BlockMath { expr } => expr,
        }
    }

    /// Returns `true` for math spans.
    #[must_use]
    pub const fn is_math(&self) -> bool {
        !matches!(self, Self::Text { .. })
    }
}

/// Iterator returned by [`segment_math_text`].
#[derive(Debug, Clone)]
pub struct MathSegments<'a> {
    state: State<'a>,
}

#[derive(Debug, Clone)]
enum State<'a> {
    Block(Option<&'a str>),
    Inline {
        text: &'a str,
        pos: usize,
        pending: Option<Span<'a>>,
    },
}

/// Splits text into plain and math spans.
///
/// Text that, once trimmed, starts and ends with `$$` and has no other
/// `$$` inside becomes a single [`Span::BlockMath`]. Otherwise every
/// `$...$` pair on one line becomes a [`Span::InlineMath`] and the text
/// between pairs becomes [`Span::Text`]. Empty text runs are skipped and an
/// unmatched `$` stays in the text. Outside block mode, concatenating the
/// spans with their `$` delimiters restored gives back the input.
#[must_use]
pub fn segment_math_text(text: &str) -> MathSegments<'_> {
    let state = match block_math(text) {
        Some(expr) => State::Block(Some(expr)),
        None => State::Inline {
            text,
            pos: 0,
            pending: None,
        },
    };
    MathSegments { state }
}

fn block_math(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.len() < 4 {
        return None;
    }
    let inner = trimmed.strip_prefix("$$")?.strip_suffix("$$")?;
    if inner.contains("$$") {
        return None;
    }
    Some(inner.trim())
}

impl<'a> Iterator for MathSegments<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            State::Block(expr) => expr.take().map(|expr| Span::BlockMath { expr }),
            State::Inline { text, pos, pending } => {
                if let Some(span) = pending.take() {
                    return Some(span);
                }
                if *pos >= text.len() {
                    return None;
                }

                let start = *pos;
                let found = INLINE_MATH
                    .as_ref()
                    .and_then(|re| re.captures_at(text, start))
                    .and_then(|caps| Some((caps.get(0)?, caps.get(1)?)));

                let Some((whole, expr)) = found else {
                    *pos = text.len();
                    return Some(Span::Text { html: &text[start..] });
                };

                *pos = whole.end();
                let math = Span::InlineMath {
                    expr: expr.as_str(),
                };
                if whole.start() > start {
                    *pending = Some(math);
                    Some(Span::Text {
                        html: &text[start..whole.start()],
                    })
                } else {
                    Some(math)
                }
            }
        }
    }
}

impl FusedIterator for MathSegments<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(text: &str) -> Vec<Span<'_>> {
        segment_math_text(text).collect()
    }

    /// Restores delimiters around inline math.
    fn rejoin(spans: &[Span<'_>]) -> String {
        spans
            .iter()
            .map(|span| match span {
                Span::Text { html } => (*html).to_string(),
                Span::InlineMath { expr } => format!("${expr}$"),
                Span::BlockMath { expr } => format!("$${expr}$$"),
            })
            .collect()
    }

    #[test]
    fn test_block_math() {
        assert_eq!(
            segments("$$x^2$$"),
            vec![Span::BlockMath { expr: "x^2" }]
        );
        assert_eq!(
            segments("  $$ \\frac{a}{b} $$\n"),
            vec![Span::BlockMath {
                expr: "\\frac{a}{b}"
            }]
        );
    }

    #[test]
    fn test_inline_math() {
        assert_eq!(
            segments("המחיר $P$ והכמות $Q$"),
            vec![
                Span::Text { html: "המחיר " },
                Span::InlineMath { expr: "P" },
                Span::Text { html: " והכמות " },
                Span::InlineMath { expr: "Q" },
            ]
        );
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(segments("שלום"), vec![Span::Text { html: "שלום" }]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_unmatched_dollar_stays_in_text() {
        assert_eq!(
            segments("עולה $5 בלבד"),
            vec![Span::Text {
                html: "עולה $5 בלבד"
            }]
        );
    }

    #[test]
    fn test_math_does_not_cross_lines() {
        assert_eq!(
            segments("a $b\nc$ d"),
            vec![Span::Text {
                html: "a $b\nc$ d"
            }]
        );
    }

    #[test]
    fn test_double_dollar_inside_text_is_not_block() {
        let spans = segments("$$a$$ ו-$$b$$");
        assert!(spans.iter().all(|s| !matches!(s, Span::BlockMath { .. })));
        assert_eq!(rejoin(&spans), "$$a$$ ו-$$b$$");
    }

    #[test]
    fn test_adjacent_math_has_no_empty_text() {
        assert_eq!(
            segments("$a$$b$"),
            vec![Span::InlineMath { expr: "a" }, Span::InlineMath { expr: "b" }]
        );
    }

    #[test]
    fn test_rejoin_reconstructs_input() {
        for text in ["x $a$ y $b$ z", "$a$", "לפני $$ אחרי", "a$b", "$1 + $2 = $3"] {
            assert_eq!(rejoin(&segments(text)), text, "input: {text}");
        }
    }

    #[test]
    fn test_iterator_is_lazy_and_clonable() {
        let mut iter = segment_math_text("a $b$ c");
        let snapshot = iter.clone();
        assert_eq!(iter.next(), Some(Span::Text { html: "a " }));
        assert_eq!(snapshot.count(), 3);
    }

    #[test]
    fn test_span_serialization() {
        let json = serde_json::to_value(Span::InlineMath { expr: "x" }).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "kind": "inlineMath", "expr": "x" }));
    }
}
