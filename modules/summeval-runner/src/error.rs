use summeval_metrics::MetricsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Scoring task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
