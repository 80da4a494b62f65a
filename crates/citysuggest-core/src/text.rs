// crates/citysuggest-core/src/text.rs

//! Text normalization and string distance.
//!
//! Catalog names and queries go through the same [`normalize`] pass, so every
//! comparison in the index and the scorer happens on folded ASCII text.

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Łódź` -> `Lodz`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use citysuggest_core::text::fold_key;
///
/// assert_eq!(fold_key("Québec"), "quebec");
/// assert_eq!(fold_key("Łódź"), "lodz");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Fold, trim and collapse whitespace runs into a single space.
///
/// This is the one normalization used for both catalog names and queries.
pub fn normalize(s: &str) -> String {
    let folded = fold_key(s);
    let mut out = String::with_capacity(folded.len());
    for word in folded.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Split a normalized string into word tokens on every non-alphanumeric char.
///
/// ```rust
/// use citysuggest_core::text::tokenize;
///
/// assert_eq!(tokenize("saint-jean-sur-richelieu").len(), 4);
/// assert_eq!(tokenize("mont-royal"), vec!["mont", "royal"]);
/// ```
pub fn tokenize(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Number of edits a query of `len` characters may be away from a name.
///
/// Very short queries get no fuzzy budget at all: with one or two letters
/// almost every name is one edit away.
pub const fn edit_budget(len: usize) -> usize {
    match len {
        0..=3 => 0,
        4..=7 => 1,
        _ => 2,
    }
}

/// Levenshtein distance between `a` and `b`, or `None` once it exceeds `max`.
///
/// Works on chars, not bytes. Two early exits keep the worst case bounded:
/// the length difference is a lower bound on the distance, and a DP row whose
/// minimum is above `max` can never come back under it.
pub fn bounded_levenshtein(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ac) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];

        for (j, &bc) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ac != bc);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diag + cost);
            diag = above;
            row_min = row_min.min(row[j + 1]);
        }

        if row_min > max {
            return None;
        }
    }

    let distance = row[b.len()];
    (distance <= max).then_some(distance)
}

/// Character count, used for coverage ratios and budgets.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
