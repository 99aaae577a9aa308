// src/normalize/mod.rs
pub mod numwords;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

pub use numwords::{cardinal, NumberWordError};

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").unwrap());
static LETTERS_THEN_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z]+)([0-9]+)").unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Canonicalize one food description.
///
/// Lowercases, strips `(...)` asides and hyphens, splits letters from
/// trailing digits, spells out every digit run and rewrites `%` as
/// `" percent"`. The result is not trimmed.
///
/// Digit runs are substituted as plain substrings, in order of first
/// appearance, so a shorter run also rewrites longer runs that contain it:
/// `"1 and 12"` becomes `"one and one2"`. Downstream files have always been
/// produced this way, so the behavior is kept.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_ascii_lowercase();
    let no_parens = PARENTHETICAL.replace_all(&lowered, "");
    let no_hyphens = no_parens.replace('-', "");
    let mut out = LETTERS_THEN_DIGITS
        .replace_all(&no_hyphens, "${1} ${2}")
        .into_owned();

    let mut seen: Vec<String> = Vec::new();
    for m in DIGIT_RUN.find_iter(&out) {
        if !seen.iter().any(|s| s == m.as_str()) {
            seen.push(m.as_str().to_string());
        }
    }
    for number in &seen {
        match cardinal(number) {
            Ok(words) => out = out.replace(number.as_str(), &words),
            Err(e) => trace!(number = %number, error = %e, "leaving number as digits"),
        }
    }

    if out.contains('%') {
        out = out.replace('%', " percent");
    }
    out
}

/// Split a normalized description into its canonical name and modifiers.
///
/// Every comma-separated segment is trimmed; the first is the name.
pub fn split_segments(normalized: &str) -> (String, Vec<String>) {
    let mut segments = normalized.split(',').map(|s| s.trim().to_string());
    // `split` always yields at least one item
    let name = segments.next().unwrap_or_default();
    (name, segments.collect())
}
