/// Vietnamese-aware collation key for name sorting
///
/// Builds a fold of the name for ordering: NFD decomposition, combining
/// marks stripped, đ/Đ mapped to d, lowercased, whitespace collapsed. Two
/// names that fold equally are ordered by the raw string, so the resulting
/// order is total and deterministic. This approximates "vi" locale ordering
/// without an ICU dependency; full tertiary rules (â before ă) are not
/// modeled.

use unicode_normalization::UnicodeNormalization;

/// Fold a display name into its collation key.
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compare two names: folded keys first, raw strings as tie-break.
pub fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Combining marks have Unicode category Mn (Mark, Nonspacing).
/// Vietnamese uses the base Combining Diacritical Marks block; the
/// supplement and half-mark blocks are covered for pasted foreign text.
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
