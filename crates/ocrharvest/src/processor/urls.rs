use std::sync::LazyLock;

use regex::Regex;

// A scheme or `www.`, a run without whitespace, angle brackets, quotes or
// parentheses, then any number of parenthesized segments with their tails.
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b((?:https?://|www\.)[^\s<>"'()]+(?:\([^\s<>"']*\)[^\s<>"']*)*)"#,
    )
    .unwrap()
});

/// Characters treated as sentence punctuation when they end a match.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', ')', '?', ']'];

/// Extracts URLs from `text` in order of appearance.
///
/// Duplicates are kept. Matches starting with `www.` get an `http://` scheme.
pub fn extract_urls(text: &str) -> Vec<String> {
    RE_URL
        .find_iter(text)
        .filter_map(|m| normalize_url(m.as_str()))
        .collect()
}

fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches(TRAILING_PUNCTUATION);
    if trimmed.is_empty() {
        return None;
    }

    let has_www_prefix = trimmed
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("www."));

    if has_www_prefix {
        Some(format!("http://{}", trimmed))
    } else {
        Some(trimmed.to_string())
    }
}
