use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// The original text is empty, whitespace-only, or encodes to zero tokens,
    /// so a compression ratio against it is undefined.
    #[error("Empty original text: {0}")]
    EmptyOriginal(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}
