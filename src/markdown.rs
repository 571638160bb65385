//! Markdown and excerpt helpers used when composing page DTOs.

use pulldown_cmark::{html, Parser};
use regex::Regex;

/// Excerpts longer than this are cut and get an ellipsis.
const EXCERPT_LENGTH: usize = 155;

/// Converts markdown to HTML.
pub fn to_html(markdown: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(markdown));
    out
}

/// Converts markdown to the single-line HTML form stored in a page DTO's
/// `content` field: trailing newline dropped, remaining newlines folded to
/// spaces.
pub fn dto_content(markdown: &str) -> String {
    let rendered = to_html(markdown);
    let trimmed = rendered.strip_suffix('\n').unwrap_or(&rendered);
    trimmed.replace('\n', " ")
}

/// Derives a page excerpt from `text`: short texts pass through, long texts
/// are cut to 155 characters plus an ellipsis, and an empty text falls back
/// to the configured default.
pub fn excerpt(text: &str, default: &str) -> String {
    if text.is_empty() {
        return default.to_owned();
    }
    if text.chars().count() > EXCERPT_LENGTH {
        let cut: String = text.chars().take(EXCERPT_LENGTH).collect();
        return format!("{} ...", cut);
    }
    text.to_owned()
}

/// Removes markdown links and images, leaving the surrounding text. Applied
/// before excerpting so image-only posts fall back to the default excerpt.
pub fn strip_links_and_images(text: &str) -> String {
    let links = Regex::new(r"!?\[[^\]]*\]\([^)]*\)").unwrap();
    links.replace_all(text, "").into_owned()
}
