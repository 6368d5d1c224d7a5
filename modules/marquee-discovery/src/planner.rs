//! Prompt → search terms.
//!
//! A free-text mood prompt ("cozy, feel good and rainy") is split into at
//! most three search terms. Landing-page browsing uses fixed popular terms.

use std::sync::LazyLock;

use regex::Regex;

use marquee_common::Kind;

/// Used when a prompt yields no terms at all.
pub const FALLBACK_QUERY: &str = "popular movies";

pub const MAX_TERMS: usize = 3;

const POPULAR_MOVIE_TERMS: &[&str] = &["movie", "action", "comedy", "drama", "thriller"];
const POPULAR_SERIES_TERMS: &[&str] = &["series", "tv", "drama", "comedy", "action"];

// Word boundaries are ASCII-only: "andé" splits after "and".
static RE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),|(?-u:\b)and(?-u:\b)|(?-u:\b)or(?-u:\b)").unwrap()
});

/// Split on commas and the standalone words "and"/"or", trimming and
/// dropping empty pieces. Order is preserved.
pub fn split_prompt(prompt: &str) -> Vec<String> {
    RE_SEPARATOR
        .split(prompt)
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(String::from)
        .collect()
}

/// Terms for a prompt, capped at [`MAX_TERMS`]. Never empty.
pub fn plan_queries(prompt: &str) -> Vec<String> {
    plan_queries_capped(prompt, MAX_TERMS)
}

pub fn plan_queries_capped(prompt: &str, max_terms: usize) -> Vec<String> {
    let mut terms = split_prompt(prompt);
    if terms.is_empty() {
        return vec![FALLBACK_QUERY.to_string()];
    }
    terms.truncate(max_terms.max(1));
    terms
}

/// Terms used to fill a catalogue page when the user has not searched.
pub fn popular_terms(kind: Kind) -> &'static [&'static str] {
    match kind {
        Kind::Series => POPULAR_SERIES_TERMS,
        Kind::Movie | Kind::Other => POPULAR_MOVIE_TERMS,
    }
}
