use anyhow::Result;
use async_trait::async_trait;

/// Embedding-based similarity between an original and its summary
/// (BERTScore or similar), usually backed by a network service.
///
/// `Ok(None)` means the scorer has no opinion for this pair; errors are
/// logged by the evaluator and never fail the evaluation.
#[async_trait]
pub trait SemanticScorer: Send + Sync {
    async fn score(&self, reference: &str, candidate: &str) -> Result<Option<f64>>;
}

/// Scorer used when no semantic service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSemanticScorer;

#[async_trait]
impl SemanticScorer for NoSemanticScorer {
    async fn score(&self, _reference: &str, _candidate: &str) -> Result<Option<f64>> {
        Ok(None)
    }
}
