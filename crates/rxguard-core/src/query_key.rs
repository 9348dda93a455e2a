//! Cache-key normalization for free-text drug-name queries.
//!
//! Two spellings of the same query must hit the same cache entry, so the key
//! is case-folded, whitespace-collapsed, and stripped of punctuation other
//! than hyphens.

/// Normalize a free-text query into a canonical cache key.
///
/// Lowercases, keeps only alphanumerics, hyphens, and word separators, then
/// collapses separator runs to single spaces.
pub fn normalize_query(query: &str) -> String {
    let filtered: String = query
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}
