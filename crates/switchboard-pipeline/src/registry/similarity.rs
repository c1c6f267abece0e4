//! String similarity scoring for fuzzy verb resolution.

/// Levenshtein edit distance between two strings, by character.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0usize; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Similarity score in `[0.0, 1.0]` between a requested verb and a
/// registered verb.
///
/// Equal strings score 1.0. A substring relationship of at least three
/// characters scores high on its own, so that `write` resolves against
/// `write_file` without depending on edit distance across the suffix.
/// Everything else falls back to normalized Levenshtein distance.
pub fn verb_similarity(requested: &str, registered: &str) -> f64 {
    let a = requested.to_lowercase();
    let b = registered.to_lowercase();

    if a == b {
        return 1.0;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if shorter.chars().count() >= 3 && longer.contains(shorter.as_str()) {
        let ratio = shorter.chars().count() as f64 / longer.chars().count() as f64;
        return 0.75 + 0.25 * ratio;
    }

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let dist = levenshtein_distance(&a, &b);
    1.0 - dist as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("calculate", "calclate"), 1);
    }

    #[test]
    fn test_identical_verbs_score_one() {
        assert!((verb_similarity("calculate", "calculate") - 1.0).abs() < f64::EPSILON);
        // Case-insensitive
        assert!((verb_similarity("Calculate", "calculate") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_typo_scores_above_threshold() {
        assert!(verb_similarity("calclate", "calculate") > 0.6);
        assert!(verb_similarity("rememberr", "remember") > 0.6);
    }

    #[test]
    fn test_substring_boost() {
        let score = verb_similarity("write", "write_file");
        assert!(score > 0.8, "got {}", score);
        // Short substrings get no boost
        assert!(verb_similarity("at", "calculate") < 0.6);
    }

    #[test]
    fn test_unrelated_verbs_score_low() {
        assert!(verb_similarity("search", "remember") < 0.6);
        assert!(verb_similarity("xyz", "calculate") < 0.3);
    }
}
