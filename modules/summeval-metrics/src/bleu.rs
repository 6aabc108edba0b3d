//! Smoothed sentence-level BLEU.
//!
//! NOTE: argument order is `(reference, candidate)`, the reverse of
//! [`rouge_n`](crate::rouge_n) and [`rouge_l`](crate::rouge_l). Stored metric
//! history was produced with this order, so it is kept as is.

use crate::ngram::ngram_counts;
use crate::tokenize::tokenize;

/// Highest n-gram order used when none is given.
pub const DEFAULT_MAX_N: usize = 4;

/// Numerator substituted for a zero match count.
pub const ZERO_MATCH_EPSILON: f64 = 0.1;

/// Precision assigned to order `n` when the candidate has fewer than `n`
/// tokens: `0.1 / 10^n`.
///
/// This is an ad hoc floor, not one of the published BLEU smoothing methods
/// (Chen & Cherry 1-7). Existing scores depend on it, so do not "fix" it.
pub fn short_candidate_floor(n: usize) -> f64 {
    ZERO_MATCH_EPSILON / 10f64.powi(n as i32)
}

/// BLEU of `candidate` against `reference` over orders `1..=max_n`.
///
/// Per order, clipped matches are divided by the number of candidate n-grams.
/// A zero match count is replaced by [`ZERO_MATCH_EPSILON`] and an order the
/// candidate is too short for gets [`short_candidate_floor`], so one missing
/// order never zeroes the geometric mean. The result is scaled by the
/// brevity penalty `exp(1 - ref_len / cand_len)` unless the candidate is
/// strictly longer than the reference.
///
/// Returns 0 if either text has no tokens or `max_n` is 0.
pub fn bleu(reference: &str, candidate: &str, max_n: usize) -> f64 {
    let reference_tokens = tokenize(reference);
    let candidate_tokens = tokenize(candidate);

    if reference_tokens.is_empty() || candidate_tokens.is_empty() || max_n == 0 {
        return 0.0;
    }

    let mut log_sum = 0.0;
    for n in 1..=max_n {
        log_sum += modified_precision(&reference_tokens, &candidate_tokens, n).ln();
    }
    let geometric_mean = (log_sum / max_n as f64).exp();

    brevity_penalty(reference_tokens.len(), candidate_tokens.len()) * geometric_mean
}

/// Smoothed clipped precision for a single n-gram order.
fn modified_precision(reference: &[String], candidate: &[String], n: usize) -> f64 {
    let predicted = candidate.len() as i64 - n as i64 + 1;
    if predicted <= 0 {
        return short_candidate_floor(n);
    }

    let reference_counts = ngram_counts(reference, n);
    let matches: usize = ngram_counts(candidate, n)
        .iter()
        .filter_map(|(gram, &count)| reference_counts.get(gram).map(|&r| count.min(r)))
        .sum();

    if matches == 0 {
        ZERO_MATCH_EPSILON / predicted as f64
    } else {
        matches as f64 / predicted as f64
    }
}

fn brevity_penalty(reference_len: usize, candidate_len: usize) -> f64 {
    if candidate_len > reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / candidate_len as f64).exp()
    }
}
