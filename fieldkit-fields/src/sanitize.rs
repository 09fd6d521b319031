//! Input sanitizers shared by the built-in field types.
//!
//! Every function here is idempotent: running it on its own output returns
//! the same value.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Number, Value};

use crate::types::as_number;

static SCRIPT_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static INLINE_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));
static RICH_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").expect("valid regex"));
static EVENT_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex")
});
static JS_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+(href|src)\s*=\s*("\s*javascript:[^"]*"|'\s*javascript:[^']*'|javascript:[^\s>]*)"#)
        .expect("valid regex")
});

/// Tags kept by [`rich_text`].
const ALLOWED_RICH_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i",
    "li", "ol", "p", "pre", "s", "span", "strong", "sub", "sup", "u", "ul",
];

/// Remove `<script>`/`<style>` blocks, then every remaining tag.
pub fn strip_tags(input: &str) -> String {
    let without_blocks = SCRIPT_STYLE_RE.replace_all(input, "");
    TAG_RE.replace_all(&without_blocks, "").into_owned()
}

/// Single-line text: strip markup, collapse all whitespace runs to one space, trim.
pub fn text(input: &str) -> String {
    let stripped = strip_tags(input);
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Multi-line text: strip markup, collapse spaces and tabs, keep line breaks.
pub fn textarea(input: &str) -> String {
    let stripped = strip_tags(input).replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = stripped
        .split('\n')
        .map(|line| INLINE_SPACE_RE.replace_all(line, " ").trim_end().to_string())
        .collect();
    lines.join("\n").trim().to_string()
}

/// Rich text: keep an allowlist of formatting tags, drop event handlers and
/// `javascript:` links, drop script/style blocks and every other tag.
///
/// Removing one attribute can splice its neighbours into another, so the
/// filter is repeated until the output stops changing.
pub fn rich_text(input: &str) -> String {
    let mut current = rich_text_pass(input);
    loop {
        let next = rich_text_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn rich_text_pass(input: &str) -> String {
    let without_blocks = SCRIPT_STYLE_RE.replace_all(input, "");
    let filtered = RICH_TAG_RE.replace_all(&without_blocks, |caps: &Captures| {
        let closing = &caps[1];
        let tag = caps[2].to_ascii_lowercase();
        if !ALLOWED_RICH_TAGS.contains(&tag.as_str()) {
            return String::new();
        }
        if !closing.is_empty() {
            return format!("</{tag}>");
        }
        let attrs = EVENT_ATTR_RE.replace_all(&caps[3], "");
        let attrs = JS_URL_RE.replace_all(&attrs, "");
        format!("<{tag}{attrs}>")
    });
    filtered.trim().to_string()
}

/// Default sanitizer: strings go through [`text`], everything else passes
/// through unchanged.
pub fn default_value(input: Value) -> Value {
    match input {
        Value::String(s) => Value::String(text(&s)),
        other => other,
    }
}

/// Apply a string sanitizer to string input only.
pub fn map_string(input: Value, f: impl Fn(&str) -> String) -> Value {
    match input {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

/// Numbers stay numbers; numeric strings become numbers (integers when they
/// fit); anything else becomes null.
pub fn number(input: Value) -> Value {
    match &input {
        Value::Number(_) => input,
        Value::String(s) => {
            let cleaned = text(s);
            if let Ok(i) = cleaned.parse::<i64>() {
                Value::Number(i.into())
            } else {
                as_number(&Value::String(cleaned))
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        _ => Value::Null,
    }
}

/// Truthiness as a checkbox sees it.
pub fn checkbox(input: Value) -> Value {
    let checked = match &input {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "on" | "yes" | "true"
        ),
        _ => false,
    };
    Value::Bool(checked)
}

/// Hex color normalized to lowercase `#rgb` / `#rrggbb`; invalid input becomes `""`.
pub fn hex_color(input: &str) -> String {
    let cleaned = text(input);
    if HEX_COLOR_RE.is_match(&cleaned) {
        format!("#{}", cleaned.trim_start_matches('#').to_ascii_lowercase())
    } else {
        String::new()
    }
}

/// Email: text-sanitized with all whitespace removed.
pub fn email(input: &str) -> String {
    text(input).chars().filter(|c| !c.is_whitespace()).collect()
}

/// URL: text-sanitized with all whitespace removed.
pub fn url(input: &str) -> String {
    text(input).chars().filter(|c| !c.is_whitespace()).collect()
}

/// Calendar date in `YYYY-MM-DD` form; anything that is not a real date becomes `""`.
pub fn date(input: &str) -> String {
    let cleaned = text(input);
    match chrono::NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_strips_markup_and_collapses_whitespace() {
        assert_eq!(text("  <b>Hello</b>\n\t  world  "), "Hello world");
        assert_eq!(text("<script>alert(1)</script>safe"), "safe");
        assert_eq!(text("a < b"), "a < b");
    }

    #[test]
    fn text_is_idempotent() {
        for input in [
            "  <p>Some   <em>text</em></p> ",
            "<<b>b>",
            "x < y > z",
            "already clean",
            "<style>p{}</style>\n\nline",
        ] {
            let once = text(input);
            assert_eq!(text(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn textarea_keeps_line_breaks() {
        assert_eq!(
            textarea("first  line\r\n<i>second</i>\t\tline\n"),
            "first line\nsecond line"
        );
        let once = textarea(" a \n\n b ");
        assert_eq!(textarea(&once), once);
    }

    #[test]
    fn rich_text_keeps_allowed_tags_only() {
        let input = r#"<p onclick="x()">Hi <strong>there</strong><iframe src="e"></iframe><script>bad()</script></p>"#;
        assert_eq!(rich_text(input), "<p>Hi <strong>there</strong></p>");
        let link = r#"<a href="javascript:alert(1)" title="t">x</a>"#;
        assert_eq!(rich_text(link), r#"<a title="t">x</a>"#);
        let once = rich_text(input);
        assert_eq!(rich_text(&once), once);
    }

    #[test]
    fn rich_text_removes_handlers_spliced_by_removal() {
        let once = rich_text(r#"<a o onclick="x"nmouseover=y>z</a>"#);
        assert!(!once.contains("onmouseover"), "{once}");
        assert_eq!(rich_text(&once), once);
    }

    #[test]
    fn default_passes_non_strings_through() {
        assert_eq!(default_value(json!(5)), json!(5));
        assert_eq!(default_value(json!(["<b>a</b>"])), json!(["<b>a</b>"]));
        assert_eq!(default_value(json!(" <b>a</b> ")), json!("a"));
    }

    #[test]
    fn number_parses_numeric_strings() {
        assert_eq!(number(json!("-5")), json!(-5));
        assert_eq!(number(json!(" 2.5 ")), json!(2.5));
        assert_eq!(number(json!(7)), json!(7));
        assert_eq!(number(json!("abc")), json!(null));
        assert_eq!(number(json!("")), json!(null));
    }

    #[test]
    fn checkbox_normalizes_truthiness() {
        assert_eq!(checkbox(json!("on")), json!(true));
        assert_eq!(checkbox(json!("1")), json!(true));
        assert_eq!(checkbox(json!(0)), json!(false));
        assert_eq!(checkbox(json!(null)), json!(false));
        assert_eq!(checkbox(json!("0")), json!(false));
    }

    #[test]
    fn hex_color_normalizes_or_empties() {
        assert_eq!(hex_color("FFAA00"), "#ffaa00");
        assert_eq!(hex_color("#AbC"), "#abc");
        assert_eq!(hex_color("red"), "");
    }

    #[test]
    fn date_requires_real_calendar_date() {
        assert_eq!(date("2024-02-29"), "2024-02-29");
        assert_eq!(date("2023-02-29"), "");
        assert_eq!(date("next tuesday"), "");
    }

    #[test]
    fn email_and_url_drop_whitespace() {
        assert_eq!(email(" user @example.com "), "user@example.com");
        assert_eq!(url(" https://example.com/a b "), "https://example.com/ab");
    }
}
