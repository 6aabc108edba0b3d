use serde::{Deserialize, Serialize};

use crate::bleu::{bleu, DEFAULT_MAX_N};
use crate::rouge::{rouge_l, rouge_n};

/// The four lexical scores of one summary, each in `[0, 1]` and rounded to
/// four decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub rouge1: f64,
    pub rouge2: f64,
    #[serde(rename = "rougeL")]
    pub rouge_l: f64,
    pub bleu: f64,
}

/// Score `summary` against `original`.
///
/// ROUGE is called as `(summary, original)` and BLEU as `(original, summary)`.
pub fn calculate_lexical_metrics(summary: &str, original: &str) -> EvaluationMetrics {
    EvaluationMetrics {
        rouge1: round_to(rouge_n(summary, original, 1), 4),
        rouge2: round_to(rouge_n(summary, original, 2), 4),
        rouge_l: round_to(rouge_l(summary, original), 4),
        bleu: round_to(bleu(original, summary, DEFAULT_MAX_N), 4),
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_maxes_every_metric() {
        let text = "Ngân hàng Nhà nước giữ nguyên lãi suất điều hành trong quý này.";
        let m = calculate_lexical_metrics(text, text);
        assert_eq!(m.rouge1, 1.0);
        assert_eq!(m.rouge2, 1.0);
        assert_eq!(m.rouge_l, 1.0);
        assert_eq!(m.bleu, 1.0);
    }

    #[test]
    fn scores_are_rounded_to_four_places() {
        let m = calculate_lexical_metrics(
            "The fox jumps over the dog.",
            "The quick brown fox jumps over the lazy dog.",
        );
        assert_eq!(m.rouge1, 0.6667);
        assert_eq!(m.rouge2, 0.375);
        assert_eq!(m.rouge_l, 0.6667);
        assert!(m.bleu > 0.0 && m.bleu <= 1.0);
        assert!(m.rouge1 > m.rouge2);
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let m = calculate_lexical_metrics("", "Some original article.");
        assert_eq!(m, EvaluationMetrics::default());
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(57.142857, 2), 57.14);
        assert_eq!(round_to(0.0, 4), 0.0);
    }

    #[test]
    fn serializes_with_rouge_l_camel_case() {
        let json = serde_json::to_value(EvaluationMetrics {
            rouge1: 0.5,
            rouge2: 0.25,
            rouge_l: 0.4,
            bleu: 0.1,
        })
        .unwrap();
        assert_eq!(json["rougeL"], 0.4);
        assert_eq!(json["rouge1"], 0.5);
    }
}
