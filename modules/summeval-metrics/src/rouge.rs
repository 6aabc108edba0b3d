//! Recall-oriented ROUGE scores.
//!
//! Both scorers take `(candidate, reference)` and divide by the size of the
//! reference, so they reward coverage of the reference rather than brevity
//! of the candidate.

use crate::ngram::{ngram_counts, ngrams};
use crate::tokenize::tokenize;

/// ROUGE-N recall of `candidate` against `reference`.
///
/// Candidate n-grams are matched in order against a multiset of reference
/// n-grams; every match consumes one reference occurrence, so a repeated
/// n-gram is never counted more times than the reference contains it.
/// Returns 0 when the reference has no n-grams.
pub fn rouge_n(candidate: &str, reference: &str, n: usize) -> f64 {
    let candidate_tokens = tokenize(candidate);
    let reference_tokens = tokenize(reference);

    if reference_tokens.is_empty() {
        return 0.0;
    }

    let reference_total = ngrams(&reference_tokens, n).len();
    if reference_total == 0 {
        return 0.0;
    }

    let mut remaining = ngram_counts(&reference_tokens, n);
    let mut overlap = 0usize;
    for gram in ngrams(&candidate_tokens, n) {
        if let Some(count) = remaining.get_mut(&gram) {
            if *count > 0 {
                overlap += 1;
                *count -= 1;
            }
        }
    }

    overlap as f64 / reference_total as f64
}

/// ROUGE-L recall: longest common subsequence over reference length.
pub fn rouge_l(candidate: &str, reference: &str) -> f64 {
    let candidate_tokens = tokenize(candidate);
    let reference_tokens = tokenize(reference);

    if reference_tokens.is_empty() {
        return 0.0;
    }

    lcs_length(&candidate_tokens, &reference_tokens) as f64 / reference_tokens.len() as f64
}

/// Length of the longest common subsequence of two token sequences.
///
/// Standard O(m·n) table, kept as two rolling rows.
pub fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
