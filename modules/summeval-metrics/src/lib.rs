//! Lexical scoring for generated summaries.
//!
//! Everything here is pure and synchronous: scores are computed per
//! (candidate, reference) pair and nothing is cached between calls, so the
//! functions can be called from any thread or task without coordination.

pub mod bleu;
pub mod compression;
pub mod error;
pub mod lexical;
pub mod metric;
pub mod ngram;
pub mod rouge;
pub mod tokenize;

pub use bleu::{bleu, DEFAULT_MAX_N};
pub use compression::{CompressionCalculator, CompressionRateInput, CompressionRateResult};
pub use error::MetricsError;
pub use lexical::{calculate_lexical_metrics, round_to, EvaluationMetrics};
pub use metric::Metric;
pub use rouge::{lcs_length, rouge_l, rouge_n};
pub use tokenize::{tokenize, WordTokenizer};
