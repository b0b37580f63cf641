//! Text primitives shared by every extractor: locale digit translation,
//! the Iranian phone pattern, DOM text flattening and URL resolution.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

/// Mobile numbers with an optional `+98` / `0098` / `0` prefix, or landlines
/// with a 2-3 digit area code and an optional space before the subscriber part.
pub static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+98|0098|0)?9[0-9]{9}|0[0-9]{2,3}\s?[0-9]{6,8}").expect("valid phone regex")
});

/// Translate Persian (`۰-۹`) and Arabic-Indic (`٠-٩`) digits to ASCII.
#[must_use]
pub fn to_ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// All phone-pattern matches in `text`, in order of appearance.
///
/// The input is digit-normalized first, so callers may pass raw page text.
#[must_use]
pub fn find_phones(text: &str) -> Vec<String> {
    let ascii = to_ascii_digits(text);
    PHONE_RE
        .find_iter(&ascii)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Text of an element with each text node trimmed and the non-empty pieces
/// joined by a single space.
#[must_use]
pub fn element_text(el: ElementRef<'_>) -> String {
    join_text(el.text(), " ")
}

/// Text of an element with each text node trimmed and the pieces glued
/// together without a separator. Used for label-prefix matching.
#[must_use]
pub fn compact_text(el: ElementRef<'_>) -> String {
    join_text(el.text(), "")
}

/// Flattened, space-joined text of the whole document.
#[must_use]
pub fn document_text(document: &Html) -> String {
    element_text(document.root_element())
}

fn join_text<'a>(pieces: impl Iterator<Item = &'a str>, sep: &str) -> String {
    pieces
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Resolve `candidate` against `base`, the way a browser resolves an `href`.
///
/// Falls back to the trimmed candidate when either side cannot be parsed.
#[must_use]
pub fn resolve_url(base: &str, candidate: &str) -> String {
    let candidate = candidate.trim();
    Url::parse(base)
        .and_then(|b| b.join(candidate))
        .map_or_else(|_| candidate.to_string(), String::from)
}
