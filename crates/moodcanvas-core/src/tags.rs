//! Tag normalization.
//!
//! Tags and queries are compared trimmed and lower-cased. Every comparison in
//! the engine goes through these helpers so stored data with stray casing or
//! whitespace still matches.

/// Normalize a single tag or query: trim surrounding whitespace, lower-case.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a tag list, dropping empty tags and duplicates.
///
/// First occurrence wins, so the relative order of the input is preserved.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in raw {
        let tag = normalize_tag(tag.as_ref());
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Number of alphanumeric characters in a query.
///
/// Punctuation and whitespace carry no mood signal, so `"?!"` counts as zero.
pub fn meaningful_len(query: &str) -> usize {
    query.chars().filter(|c| c.is_alphanumeric()).count()
}
