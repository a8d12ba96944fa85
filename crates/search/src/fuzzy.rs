//! Fuzzy matching helpers.
//!
//! Stateless functions shared by the string and array matchers.

use unicode_segmentation::UnicodeSegmentation;

/// Normalize a term for comparison.
///
/// Lowercases, drops punctuation and collapses whitespace, so
/// `"Semi-Detached "` and `"semi detached"` compare equal.
pub fn normalize(text: &str) -> String {
    text.unicode_words()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Calculate Levenshtein edit distance between two strings.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// Number of single-character edits needed to transform a into b
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    // Use two rows for space optimization
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Normalized edit-distance similarity in `[0.0, 1.0]`.
///
/// `1.0 - distance / max(len(a), len(b))`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / longest as f64
}

/// Returns true when either normalized term contains the other.
///
/// Empty terms never count as contained.
pub fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_levenshtein_same() {
        assert_eq!(levenshtein_distance("condo", "condo"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein_distance("condo", "candi"), 2);
        assert_eq!(levenshtein_distance("loft", "lift"), 1);
    }

    #[test]
    fn test_levenshtein_insert_delete() {
        assert_eq!(levenshtein_distance("townhose", "townhouse"), 1);
        assert_eq!(levenshtein_distance("townhouse", "townhose"), 1);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("loft", "loft"), 1.0);
    }

    #[test]
    fn test_similarity_typo() {
        let score = similarity("townhouse", "townhose");
        assert!(score > 0.8 && score < 1.0, "got {}", score);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Semi-Detached  "), "semi detached");
        assert_eq!(normalize("In-Suite   LAUNDRY"), "in suite laundry");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_contains_either() {
        assert!(contains_either("condo townhouse", "townhouse"));
        assert!(contains_either("pool", "indoor pool"));
        assert!(!contains_either("", "pool"));
        assert!(!contains_either("gym", "pool"));
    }

    proptest! {
        #[test]
        fn prop_similarity_in_unit_interval(a in "[a-z ]{0,12}", b in "[a-z ]{0,12}") {
            let s = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn prop_levenshtein_symmetric(a in "[a-z]{0,10}", b in "[a-z]{0,10}") {
            prop_assert_eq!(levenshtein_distance(&a, &b), levenshtein_distance(&b, &a));
        }

        #[test]
        fn prop_normalize_idempotent(text in "[A-Za-z -]{0,20}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once.clone());
        }
    }
}
