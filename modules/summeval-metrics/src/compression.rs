//! Token-based compression rate.
//!
//! Counts are taken with the byte-pair encoding the target LLM family uses,
//! not with [`WordTokenizer`](crate::WordTokenizer), so the ratio is in the
//! same unit the model is billed and limited in.

use serde::{Deserialize, Serialize};
use tiktoken_rs::{cl100k_base, get_bpe_from_model, o200k_base, CoreBPE};
use tracing::debug;

use crate::error::MetricsError;
use crate::lexical::round_to;

/// Encoding used by the GPT-3.5 / GPT-4 family.
pub const DEFAULT_ENCODING: &str = "cl100k_base";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionRateInput {
    /// The full original article text.
    pub original_text: String,
    /// The generated summary. Missing or empty counts as zero tokens.
    #[serde(default)]
    pub summary_text: Option<String>,
}

impl CompressionRateInput {
    pub fn new(original_text: impl Into<String>, summary_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            summary_text: Some(summary_text.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionRateResult {
    /// Always at least 1.
    pub original_tokens: usize,
    pub summary_tokens: usize,
    /// `summary_tokens / original_tokens * 100`, two decimals. 100 means no
    /// compression; 20 means the summary is a fifth of the original.
    pub compression_rate: f64,
}

/// Compression-rate calculator bound to one BPE vocabulary.
///
/// Loading the vocabulary is the expensive part, so build one calculator and
/// share it (it is immutable and `Send + Sync`).
pub struct CompressionCalculator {
    encoding: String,
    bpe: CoreBPE,
}

impl CompressionCalculator {
    /// Calculator using [`DEFAULT_ENCODING`].
    pub fn cl100k() -> Result<Self, MetricsError> {
        Self::for_encoding(DEFAULT_ENCODING)
    }

    /// Accepts an encoding name (`cl100k_base`, `o200k_base`) or any model
    /// name tiktoken knows (`gpt-4o-mini`, `gpt-3.5-turbo`, ...).
    pub fn for_encoding(name: &str) -> Result<Self, MetricsError> {
        let lower = name.trim().to_ascii_lowercase();
        let bpe = match lower.as_str() {
            "cl100k_base" => cl100k_base(),
            "o200k_base" => o200k_base(),
            model => get_bpe_from_model(model),
        }
        .map_err(|e| MetricsError::Encoding(format!("{name}: {e}")))?;

        debug!(encoding = lower.as_str(), "Loaded BPE vocabulary");
        Ok(Self { encoding: lower, bpe })
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Number of BPE tokens in `text`. Special-token markup is counted as
    /// plain text.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Compression rate of `input.summary_text` relative to
    /// `input.original_text`.
    ///
    /// Fails with [`MetricsError::EmptyOriginal`] when the original is empty,
    /// whitespace-only, or encodes to zero tokens.
    pub fn calculate(&self, input: &CompressionRateInput) -> Result<CompressionRateResult, MetricsError> {
        if input.original_text.trim().is_empty() {
            return Err(MetricsError::EmptyOriginal(
                "original text is empty or whitespace-only".to_string(),
            ));
        }

        let original_tokens = self.count_tokens(&input.original_text);
        if original_tokens == 0 {
            return Err(MetricsError::EmptyOriginal(
                "original text produced 0 tokens after encoding".to_string(),
            ));
        }

        let summary_tokens = match input.summary_text.as_deref() {
            Some(summary) if !summary.is_empty() => self.count_tokens(summary),
            _ => 0,
        };

        let rate = summary_tokens as f64 / original_tokens as f64 * 100.0;

        Ok(CompressionRateResult {
            original_tokens,
            summary_tokens,
            compression_rate: round_to(rate, 2),
        })
    }
}

impl std::fmt::Debug for CompressionCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionCalculator")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}
