use std::env;
use std::time::Duration;

use summeval_metrics::compression::DEFAULT_ENCODING;
use tracing::info;

use crate::error::EvalError;

/// Runner configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// BPE encoding or model name for compression-rate token counts.
    pub encoding: String,
    /// Dataset records evaluated at once.
    pub concurrency: usize,
    /// Upper bound on a single semantic-score call.
    pub semantic_timeout: Duration,
    /// Characters of the original text kept in batch rows.
    pub preview_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            concurrency: 2,
            semantic_timeout: Duration::from_secs(30),
            preview_chars: 200,
        }
    }
}

impl Config {
    /// Load configuration from the process environment. Every variable is
    /// optional; malformed values are an error rather than a silent default.
    pub fn from_env() -> Result<Self, EvalError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EvalError> {
        let defaults = Self::default();

        let encoding = lookup("SUMMEVAL_ENCODING")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.encoding);

        let concurrency = parse_or(&lookup, "SUMMEVAL_CONCURRENCY", defaults.concurrency)?;
        if concurrency == 0 {
            return Err(EvalError::Config(
                "SUMMEVAL_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let timeout_secs = parse_or(
            &lookup,
            "SUMMEVAL_SEMANTIC_TIMEOUT_SECS",
            defaults.semantic_timeout.as_secs(),
        )?;

        Ok(Self {
            encoding,
            concurrency,
            semantic_timeout: Duration::from_secs(timeout_secs),
            preview_chars: parse_or(&lookup, "SUMMEVAL_SAVE_PREVIEW_CHARS", defaults.preview_chars)?,
        })
    }

    pub fn log_summary(&self) {
        info!(
            encoding = self.encoding.as_str(),
            concurrency = self.concurrency,
            semantic_timeout_secs = self.semantic_timeout.as_secs(),
            preview_chars = self.preview_chars,
            "Configuration loaded"
        );
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, EvalError> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| EvalError::Config(format!("{key} must be a non-negative integer, got {raw:?}"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.encoding, "cl100k_base");
        assert_eq!(config.concurrency, 2);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SUMMEVAL_ENCODING", "o200k_base"),
            ("SUMMEVAL_CONCURRENCY", "8"),
            ("SUMMEVAL_SEMANTIC_TIMEOUT_SECS", "5"),
            ("SUMMEVAL_SAVE_PREVIEW_CHARS", " 50 "),
        ]))
        .unwrap();
        assert_eq!(config.encoding, "o200k_base");
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.semantic_timeout, Duration::from_secs(5));
        assert_eq!(config.preview_chars, 50);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = Config::from_lookup(lookup(&[("SUMMEVAL_CONCURRENCY", "lots")])).unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));

        let err = Config::from_lookup(lookup(&[("SUMMEVAL_CONCURRENCY", "0")])).unwrap_err();
        assert!(matches!(err, EvalError::Config(_)));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("SUMMEVAL_ENCODING", "  "),
            ("SUMMEVAL_CONCURRENCY", ""),
        ]))
        .unwrap();
        assert_eq!(config, Config::default());
    }
}
