use std::collections::BTreeSet;

/// Minimum term length kept by [`extract_terms`]; shorter tokens ("of", "id") are noise.
pub const MIN_TERM_LEN: usize = 3;

/// Lower-cases, strips everything but alphanumerics and whitespace, collapses whitespace.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|ch| ch.is_alphanumeric() || ch.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-split terms of [`normalize`], dropping tokens of two characters or fewer.
pub fn extract_terms(raw: &str) -> BTreeSet<String> {
    normalize(raw)
        .split(' ')
        .filter(|token| token.chars().count() >= MIN_TERM_LEN)
        .map(str::to_string)
        .collect()
}

/// Containment in either direction. Empty operands never match, otherwise every string would
/// "contain" an empty alias.
pub(crate) fn overlaps(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}
