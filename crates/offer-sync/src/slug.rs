use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").expect("disallowed pattern compiles"));
static HYPHEN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("hyphen pattern compiles"));

/// Turn free text into a URL-safe slug.
///
/// Lowercases and trims, replaces whitespace runs with a hyphen, drops
/// anything outside `[a-z0-9_-]`, squeezes repeated hyphens and strips them
/// from both ends. `None` and empty input both yield an empty string.
///
/// ```
/// use offer_sync::slugify;
///
/// assert_eq!(slugify("  Hello   World!! "), "hello-world");
/// assert_eq!(slugify(None), "");
/// ```
pub fn slugify<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into() else {
        return String::new();
    };
    if text.is_empty() {
        return String::new();
    }

    let lowered = text.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(lowered.trim(), "-");
    let cleaned = DISALLOWED.replace_all(&hyphenated, "");
    let squeezed = HYPHEN_RUN.replace_all(&cleaned, "-");

    squeezed.trim_matches('-').to_owned()
}
