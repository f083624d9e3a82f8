use html2text::from_read;
use regex::Regex;
use std::sync::OnceLock;

/// Upper bound for an escaped TEXT value, in characters
pub const MAX_TEXT_CHARS: usize = 1000;

/// Data characters per physical line when folding a value
pub const FOLD_WIDTH: usize = 75;

const FOLD_SEPARATOR: &str = "\r\n ";

/// Escapes a value for an RFC 5545 TEXT property.
///
/// Backslash, comma, semicolon and line feed are escaped, carriage returns are
/// dropped, and the result is cut to `MAX_TEXT_CHARS` characters. A cut that
/// would leave half of an escape pair at the end drops the dangling backslash.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(ch),
        }
    }

    truncate_escaped(escaped)
}

fn truncate_escaped(mut escaped: String) -> String {
    if let Some((cut, _)) = escaped.char_indices().nth(MAX_TEXT_CHARS) {
        escaped.truncate(cut);

        let trailing_backslashes = escaped.chars().rev().take_while(|c| *c == '\\').count();
        if trailing_backslashes % 2 == 1 {
            escaped.pop();
        }
    }
    escaped
}

/// Folds a value into `FOLD_WIDTH`-character chunks joined by CRLF and one
/// space. Must run on already-escaped text; fold points are plain character
/// boundaries.
pub fn fold_value(value: &str) -> String {
    if value.chars().count() <= FOLD_WIDTH {
        return value.to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    chars
        .chunks(FOLD_WIDTH)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(FOLD_SEPARATOR)
}

/// Renders an HTML fragment as plain text, keeping paragraph breaks
pub fn html_to_text(html: &str) -> String {
    static HORIZONTAL_SPACE: OnceLock<Regex> = OnceLock::new();
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();

    let plain_text = from_read(html.as_bytes(), usize::MAX);

    let horizontal_space =
        HORIZONTAL_SPACE.get_or_init(|| Regex::new(r"[ \t]+").expect("valid regex"));
    let blank_lines = BLANK_LINES.get_or_init(|| Regex::new(r"\n\s*\n+").expect("valid regex"));

    let collapsed = horizontal_space.replace_all(&plain_text, " ");
    let collapsed = blank_lines.replace_all(&collapsed, "\n\n");

    collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
