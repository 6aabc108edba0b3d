//! Full evaluation of one (original, summary) pair.
//!
//! Lexical scores and the compression rate run on the blocking pool while
//! the semantic scorer runs on the async side, so the wall-clock cost is the
//! slower of the two rather than their sum. Each non-lexical metric fails
//! independently: a missing semantic score or an undefined compression rate
//! becomes `None` in the report.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use summeval_metrics::{
    calculate_lexical_metrics, CompressionCalculator, CompressionRateInput, EvaluationMetrics,
    Metric,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::EvalError;
use crate::semantic::{NoSemanticScorer, SemanticScorer};
use crate::usage::TokenUsage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub original: String,
    pub summary: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Usage of the completion that produced `summary`.
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl EvaluationRequest {
    pub fn new(original: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            summary: summary.into(),
            url: None,
            usage: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(flatten)]
    pub metrics: EvaluationMetrics,
    pub bert_score: Option<f64>,
    pub compression_rate: Option<f64>,
    pub total_tokens: Option<u32>,
    pub latency_ms: u64,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationReport {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Rouge1 => Some(self.metrics.rouge1),
            Metric::Rouge2 => Some(self.metrics.rouge2),
            Metric::RougeL => Some(self.metrics.rouge_l),
            Metric::Bleu => Some(self.metrics.bleu),
            Metric::BertScore => self.bert_score,
            Metric::CompressionRate => self.compression_rate,
            Metric::TotalTokens => self.total_tokens.map(f64::from),
        }
    }
}

pub struct Evaluator {
    compression: Arc<CompressionCalculator>,
    semantic: Arc<dyn SemanticScorer>,
    semantic_timeout: Duration,
}

impl Evaluator {
    pub fn new(compression: Arc<CompressionCalculator>) -> Self {
        Self {
            compression,
            semantic: Arc::new(NoSemanticScorer),
            semantic_timeout: Config::default().semantic_timeout,
        }
    }

    /// Loads the configured BPE vocabulary.
    pub fn from_config(config: &Config) -> Result<Self, EvalError> {
        let compression = CompressionCalculator::for_encoding(&config.encoding)?;
        Ok(Self::new(Arc::new(compression)).with_semantic_timeout(config.semantic_timeout))
    }

    pub fn with_semantic_scorer(mut self, scorer: Arc<dyn SemanticScorer>) -> Self {
        self.semantic = scorer;
        self
    }

    pub fn with_semantic_timeout(mut self, timeout: Duration) -> Self {
        self.semantic_timeout = timeout;
        self
    }

    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationReport, EvalError> {
        if request.original.trim().is_empty() || request.summary.trim().is_empty() {
            return Err(EvalError::InvalidInput(
                "both original and summary text are required".to_string(),
            ));
        }

        let started = Instant::now();

        let compression = self.compression.clone();
        let original = request.original.clone();
        let summary = request.summary.clone();
        let offline = tokio::task::spawn_blocking(move || {
            let metrics = calculate_lexical_metrics(&summary, &original);
            let compression =
                compression.calculate(&CompressionRateInput::new(original, summary));
            (metrics, compression)
        });

        let (offline, bert_score) = tokio::join!(
            offline,
            self.semantic_score(&request.original, &request.summary)
        );
        let (metrics, compression) = offline.map_err(|e| EvalError::Task(e.to_string()))?;

        let compression_rate = match compression {
            Ok(result) => Some(result.compression_rate),
            Err(e) => {
                warn!(error = %e, "Compression rate calculation failed");
                None
            }
        };

        let report = EvaluationReport {
            metrics,
            bert_score,
            compression_rate,
            total_tokens: request.usage.map(|u| u.total_tokens),
            latency_ms: started.elapsed().as_millis() as u64,
            evaluated_at: Utc::now(),
        };

        debug!(
            url = request.url.as_deref().unwrap_or(""),
            rouge1 = report.metrics.rouge1,
            bleu = report.metrics.bleu,
            latency_ms = report.latency_ms,
            "Evaluated summary"
        );

        Ok(report)
    }

    async fn semantic_score(&self, reference: &str, candidate: &str) -> Option<f64> {
        match tokio::time::timeout(self.semantic_timeout, self.semantic.score(reference, candidate)).await {
            Ok(Ok(score)) => score,
            Ok(Err(e)) => {
                warn!(error = %e, "Semantic score failed");
                None
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.semantic_timeout.as_secs_f64(),
                    "Semantic score timed out"
                );
                None
            }
        }
    }
}
