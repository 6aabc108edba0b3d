use std::collections::HashMap;

/// Contiguous n-grams of `tokens`, each joined with a single space.
///
/// Returns an empty vector when `n == 0` or there are fewer than `n` tokens.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

/// Occurrence count of every n-gram in `tokens`.
pub fn ngram_counts(tokens: &[String], n: usize) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for gram in ngrams(tokens, n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}
