use serde::{Deserialize, Serialize};

/// Every metric recorded for a summary, lexical or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Rouge1,
    Rouge2,
    RougeL,
    Bleu,
    BertScore,
    CompressionRate,
    TotalTokens,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Rouge1,
        Metric::Rouge2,
        Metric::RougeL,
        Metric::Bleu,
        Metric::BertScore,
        Metric::CompressionRate,
        Metric::TotalTokens,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Rouge1 => "ROUGE-1",
            Metric::Rouge2 => "ROUGE-2",
            Metric::RougeL => "ROUGE-L",
            Metric::Bleu => "BLEU",
            Metric::BertScore => "BERTScore",
            Metric::CompressionRate => "Compression rate",
            Metric::TotalTokens => "Total tokens",
        }
    }

    /// Column header used in dataset reports.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Rouge1 => "ROUGE-1",
            Metric::Rouge2 => "ROUGE-2",
            Metric::RougeL => "ROUGE-L",
            Metric::Bleu => "BLEU",
            Metric::BertScore => "BERTSCORE",
            Metric::CompressionRate => "COMPRESSION RATE",
            Metric::TotalTokens => "TOTAL TOKENS",
        }
    }

    /// What the number means, as shown next to it on the dashboard.
    pub fn description(self) -> &'static str {
        match self {
            Metric::Rouge1 => {
                "Share of the original's words that also appear in the summary. \
                 Higher means the summary covers more of the source vocabulary."
            }
            Metric::Rouge2 => {
                "Share of the original's two-word phrases that also appear in the summary. \
                 Rewards keeping phrasing, not just words."
            }
            Metric::RougeL => {
                "Longest in-order word sequence shared with the original, relative to the \
                 original's length. Captures sentence-level structure."
            }
            Metric::Bleu => {
                "Precision of the summary's 1- to 4-word phrases against the original, \
                 penalised when the summary is much shorter. Low values are normal for \
                 abstractive summaries."
            }
            Metric::BertScore => {
                "Semantic similarity from contextual embeddings. Credits paraphrases that \
                 word-overlap metrics miss."
            }
            Metric::CompressionRate => {
                "Summary length as a percentage of the original, in LLM tokens. \
                 100 means no compression; lower is more aggressive."
            }
            Metric::TotalTokens => "Prompt plus completion tokens billed for generating the summary.",
        }
    }

    /// Whether the metric is a `[0, 1]` score where higher is better.
    pub fn is_unit_score(self) -> bool {
        matches!(
            self,
            Metric::Rouge1 | Metric::Rouge2 | Metric::RougeL | Metric::Bleu | Metric::BertScore
        )
    }

    /// Display form of a value: unit scores to four decimals, compression
    /// rate as a percentage, token counts as integers.
    pub fn format_value(self, value: f64) -> String {
        if self.is_unit_score() {
            format!("{value:.4}")
        } else if self == Metric::CompressionRate {
            format!("{value:.2}%")
        } else {
            format!("{value:.0}")
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metric_is_described() {
        for metric in Metric::ALL {
            assert!(!metric.label().is_empty());
            assert!(!metric.column().is_empty());
            assert!(metric.description().len() > 20, "{metric} needs a description");
        }
    }

    #[test]
    fn unit_scores() {
        assert!(Metric::Bleu.is_unit_score());
        assert!(!Metric::CompressionRate.is_unit_score());
        assert!(!Metric::TotalTokens.is_unit_score());
    }

    #[test]
    fn formats_by_kind() {
        assert_eq!(Metric::Rouge1.format_value(0.5), "0.5000");
        assert_eq!(Metric::BertScore.format_value(0.87654), "0.8765");
        assert_eq!(Metric::CompressionRate.format_value(57.14), "57.14%");
        assert_eq!(Metric::TotalTokens.format_value(1380.0), "1380");
    }
}
