//! End-to-end dataset evaluation: JSON Lines in, result rows and summary out.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use summeval_metrics::{CompressionCalculator, Metric};
use summeval_runner::batch::{read_dataset, write_csv, write_rows};
use summeval_runner::{run_batch, BatchSummary, EvalError, Evaluator, SemanticScorer};

/// Answers slower for earlier records so completion order differs from
/// input order.
struct StaggeredScorer;

#[async_trait]
impl SemanticScorer for StaggeredScorer {
    async fn score(&self, _reference: &str, candidate: &str) -> anyhow::Result<Option<f64>> {
        let delay = 40u64.saturating_sub(candidate.len() as u64);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(Some(0.8))
    }
}

const DATASET: &str = r#"{"url": "https://example.vn/1", "original": "Giá vàng hôm nay tăng mạnh do nhu cầu trú ẩn an toàn.", "summary": "Giá vàng tăng", "usage": {"prompt_tokens": 300, "completion_tokens": 40}}
{"url": "https://example.vn/2", "original": "Ngân hàng Nhà nước giữ nguyên lãi suất điều hành.", "summary": "   "}

{"url": "https://example.vn/3", "original": "Bão số 3 đổ bộ vào các tỉnh miền Bắc, gây mưa lớn diện rộng.", "summary": "Bão số 3 gây mưa lớn ở miền Bắc.", "usage": {"total_tokens": 500}}
"#;

fn write_dataset() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DATASET.as_bytes()).unwrap();
    file
}

fn evaluator() -> Evaluator {
    Evaluator::new(Arc::new(CompressionCalculator::cl100k().unwrap()))
        .with_semantic_scorer(Arc::new(StaggeredScorer))
}

#[tokio::test]
async fn batch_preserves_order_and_isolates_failures() {
    let dataset = write_dataset();
    let records = read_dataset(dataset.path()).unwrap();
    assert_eq!(records.len(), 3);

    let rows = run_batch(&evaluator(), records, 3, 10).await;

    assert_eq!(rows.len(), 3);
    let urls: Vec<_> = rows.iter().map(|r| r.url.clone().unwrap()).collect();
    assert_eq!(
        urls,
        vec!["https://example.vn/1", "https://example.vn/2", "https://example.vn/3"]
    );
    assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 2]);

    assert!(rows[0].report.is_some());
    assert!(rows[1].report.is_none());
    assert!(rows[1].error.as_deref().unwrap().contains("required"));
    assert!(rows[2].report.is_some());

    assert_eq!(rows[0].original_preview.chars().count(), 10);
    assert_eq!(rows[0].report.as_ref().unwrap().total_tokens, Some(340));
    assert_eq!(rows[2].report.as_ref().unwrap().total_tokens, Some(500));

    let summary = BatchSummary::from_rows(&rows);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.mean(Metric::BertScore), Some(0.8));
    assert_eq!(summary.mean(Metric::TotalTokens), Some(420.0));
    let rouge1 = summary.mean(Metric::Rouge1).unwrap();
    assert!(rouge1 > 0.0 && rouge1 < 1.0);
}

#[tokio::test]
async fn rows_round_trip_through_jsonl() {
    let dataset = write_dataset();
    let rows = run_batch(&evaluator(), read_dataset(dataset.path()).unwrap(), 1, 200).await;

    let out = tempfile::NamedTempFile::new().unwrap();
    write_rows(out.reopen().unwrap(), &rows).unwrap();

    let written = std::fs::read_to_string(out.path()).unwrap();
    let lines: Vec<serde_json::Value> = written
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["url"], "https://example.vn/1");
    assert!(lines[0]["rouge1"].is_number());
    assert!(lines[0]["rougeL"].is_number());
    assert_eq!(lines[0]["bert_score"], 0.8);
    assert!(lines[0].get("error").is_none());

    assert!(lines[1]["error"].is_string());
    assert!(lines[1].get("rouge1").is_none());
}

#[tokio::test]
async fn csv_report_has_metric_columns_and_blank_failed_rows() {
    let dataset = write_dataset();
    let rows = run_batch(&evaluator(), read_dataset(dataset.path()).unwrap(), 2, 200).await;

    let mut buf = Vec::new();
    write_csv(&mut buf, &rows).unwrap();

    let mut reader = csv::Reader::from_reader(buf.as_slice());
    let header: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(
        header,
        vec![
            "URL",
            "ROUGE-1",
            "ROUGE-2",
            "ROUGE-L",
            "BLEU",
            "BERTSCORE",
            "LATENCY",
            "COMPRESSION RATE",
            "TOTAL TOKENS",
        ]
    );

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 3);

    assert_eq!(&records[0][0], "https://example.vn/1");
    assert!(records[0][1].parse::<f64>().unwrap() > 0.0);
    assert_eq!(&records[0][5], "0.8");
    assert!(records[0][6].parse::<f64>().is_ok());
    assert_eq!(&records[0][8], "340");

    assert_eq!(&records[1][0], "https://example.vn/2");
    assert!(records[1].iter().skip(1).all(str::is_empty));
    assert_eq!(records[1].len(), 9);
}

#[test]
fn missing_dataset_is_a_dataset_error() {
    let err = read_dataset(std::path::Path::new("/definitely/not/here.jsonl")).unwrap_err();
    assert!(matches!(err, EvalError::Dataset(_)));
}
