/// Canonicalize text for case- and punctuation-insensitive comparison.
///
/// Steps:
/// 1. Lowercase
/// 2. Drop everything except `a-z`, `0-9` and the space character
/// 3. Collapse runs of spaces and trim
///
/// Note that punctuation is removed, not replaced: "Sales-Report" becomes
/// "salesreport", which will not contain "sales report".
pub fn normalize(text: &str) -> String {
    let mut kept = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if matches!(c, 'a'..='z' | '0'..='9' | ' ') {
            kept.push(c);
        }
    }

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
