//! Fuzzy string comparison helpers: Levenshtein-tolerant word overlap for
//! addresses (spec.md §4.4), grounded on the `strsim` crate already used
//! across the retrieved corpus for name/address fuzzy matching.

use strsim::levenshtein;

/// Lowercase, strip non-alphanumerics (collapsing runs to single spaces),
/// split on whitespace.
fn normalize_words(s: &str) -> Vec<String> {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(|w| w.to_string()).collect()
}

fn words_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a) || levenshtein(a, b) <= 2
}

/// Word-overlap similarity: a word from each side matches if one
/// contains the other or Levenshtein distance <= 2. similarity =
/// matching / max(|wordsA|, |wordsB|). Passes if similarity > 0.7
/// (`ADDRESS_SIMILARITY_PASS`, enforced by the caller).
pub fn address_similarity(a: &str, b: &str) -> f32 {
    let words_a = normalize_words(a);
    let words_b = normalize_words(b);
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let mut used = vec![false; words_b.len()];
    let mut matched = 0;
    for wa in &words_a {
        if let Some(idx) = words_b.iter().enumerate().position(|(i, wb)| !used[i] && words_match(wa, wb)) {
            used[idx] = true;
            matched += 1;
        }
    }
    matched as f32 / words_a.len().max(words_b.len()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_addresses_score_one() {
        assert_eq!(address_similarity("123 Main St", "123 Main St"), 1.0);
    }

    #[test]
    fn minor_ocr_noise_still_matches_within_levenshtein_floor() {
        let sim = address_similarity("123 Main Street", "123 Man Street");
        assert!(sim > 0.7);
    }

    #[test]
    fn unrelated_addresses_score_low() {
        let sim = address_similarity("123 Main St Springfield", "900 Oak Ave Shelbyville");
        assert!(sim < 0.7);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(address_similarity("", "123 Main St"), 0.0);
    }
}
