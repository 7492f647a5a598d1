//! Data URI construction for inlined assets.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use crate::media_type;

/// The set escaped by `encodeURIComponent`: everything except alphanumerics
/// and `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn comment_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<!--.*?-->").expect("invalid comment regex"))
}

/// Build a data URI embedding `content` with the given media type.
///
/// SVG text is percent encoded (smaller than base64 and still readable in
/// the output); every other type is base64 with the `;base64` marker.
pub fn data_uri(content: &[u8], media_type: &str) -> String {
    if media_type == media_type::SVG {
        format!("data:{media_type},{}", encode_svg(content))
    } else {
        format!("data:{media_type};base64,{}", BASE64.encode(content))
    }
}

/// Percent-encode SVG text so it stays intact inside a single-quoted string
/// literal and inside CSS `url(...)` contexts.
///
/// Carriage returns and line feeds are stripped, tabs collapse to single
/// spaces, and HTML-style comments are removed before the component
/// encoding. Parentheses and single quotes are escaped afterwards: the
/// component encoder leaves both alone, but `url(...)` chokes on the former
/// and a literal quote would terminate the emitted module's string literal.
pub fn encode_svg(content: &[u8]) -> String {
    let text = String::from_utf8_lossy(content);

    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\r' | '\n' => {}
            '\t' => cleaned.push(' '),
            other => cleaned.push(other),
        }
    }
    let cleaned = comment_pattern().replace_all(&cleaned, "");

    utf8_percent_encode(&cleaned, URI_COMPONENT)
        .to_string()
        .replace('(', "%28")
        .replace(')', "%29")
        .replace('\'', "%27")
}
