use regex::Regex;
use std::sync::LazyLock;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("hardcoded number regex is valid"));

/// Extract numeric tokens from text, left to right.
///
/// Tokens are returned as they appear (leading zeros kept). Digits are any
/// Unicode decimal digit, so "٣.٥" is a token too. Only plain digits with an
/// optional `.fraction` are recognized:
/// - "-12.5" -> ["12.5"]
/// - "1,200" -> ["1", "200"]
/// - "1.2.3" -> ["1.2", "3"]
pub fn extract_numbers(text: &str) -> Vec<String> {
    NUMBER_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
