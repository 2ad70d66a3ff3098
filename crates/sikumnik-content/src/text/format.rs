//! Line-break normalization for authored text.

/// Inserts line breaks that authors tend to leave out.
///
/// Three rules run in order:
///
/// 1. A `?` followed by spaces or tabs and then more text on the same line
///    gets a line break in place of the whitespace.
/// 2. A list marker (digits or one Hebrew letter followed by `.` or `)` and
///    a space) that is preceded by whitespace and by other text on the same
///    line starts a new line.
/// 3. A literal backslash-n sequence becomes a real line break.
///
/// Formatting is idempotent: `format_text(&format_text(s)) == format_text(s)`.
#[must_use]
pub fn format_text(text: &str) -> String {
    let text = break_after_questions(text);
    let text = break_before_list_markers(&text);
    text.replace("\\n", "\n")
}

fn is_inline_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_hebrew_letter(c: char) -> bool {
    ('\u{05D0}'..='\u{05EA}').contains(&c)
}

fn break_after_questions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find('?') {
        let (head, tail) = rest.split_at(idx + 1);
        out.push_str(head);

        let after = tail.trim_start_matches(is_inline_space);
        let has_gap = after.len() < tail.len();
        let continues_line = !after.is_empty() && !after.starts_with(|c: char| c == '\n' || c == '\r');
        if has_gap && continues_line {
            out.push('\n');
            rest = after;
        } else {
            rest = tail;
        }
    }

    out.push_str(rest);
    out
}

fn break_before_list_markers(text: &str) -> String {
    text.split('\n')
        .map(break_line_before_markers)
        .collect::<Vec<_>>()
        .join("\n")
}

fn break_line_before_markers(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut seen_text = false;
    let mut rest = line;

    while !rest.is_empty() {
        let after = rest.trim_start_matches(is_inline_space);
        let gap = rest.len() - after.len();
        if gap > 0 {
            if seen_text && starts_with_list_marker(after) {
                out.push('\n');
            } else {
                out.push_str(&rest[..gap]);
            }
            rest = after;
            continue;
        }

        let word_len = rest.find(is_inline_space).unwrap_or(rest.len());
        out.push_str(&rest[..word_len]);
        seen_text = true;
        rest = &rest[word_len..];
    }

    out
}

/// `1. `, `12) `, `א. `, `ב) ` and the like.
fn starts_with_list_marker(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    let label_len = if first.is_ascii_digit() {
        s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len())
    } else if is_hebrew_letter(first) {
        first.len_utf8()
    } else {
        return false;
    };

    let mut rest = s[label_len..].chars();
    matches!(rest.next(), Some('.' | ')')) && rest.next().is_some_and(is_inline_space)
}
