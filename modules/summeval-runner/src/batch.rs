//! Dataset evaluation over JSON Lines.
//!
//! Each input line is an [`EvaluationRequest`]. Records are scored with
//! bounded concurrency and written back in input order; a record that fails
//! becomes a row with `error` set instead of aborting the run. Rows can be
//! written as JSON Lines or as a CSV report with one column per metric.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use summeval_metrics::Metric;
use tracing::{info, warn};

use crate::error::EvalError;
use crate::evaluate::{EvaluationReport, EvaluationRequest, Evaluator};

#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    /// Zero-based position in the input.
    pub index: usize,
    pub url: Option<String>,
    pub original_preview: String,
    #[serde(flatten)]
    pub report: Option<EvaluationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricMean {
    pub metric: Metric,
    pub mean: f64,
    /// Rows that had a value for this metric.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub means: Vec<MetricMean>,
}

impl BatchSummary {
    pub fn from_rows(rows: &[BatchRow]) -> Self {
        let reports: Vec<&EvaluationReport> = rows.iter().filter_map(|r| r.report.as_ref()).collect();

        let means = Metric::ALL
            .into_iter()
            .filter_map(|metric| {
                let values: Vec<f64> = reports.iter().filter_map(|r| r.value(metric)).collect();
                if values.is_empty() {
                    return None;
                }
                Some(MetricMean {
                    metric,
                    mean: values.iter().sum::<f64>() / values.len() as f64,
                    count: values.len(),
                })
            })
            .collect();

        Self {
            total: rows.len(),
            succeeded: reports.len(),
            failed: rows.len() - reports.len(),
            means,
        }
    }

    pub fn mean(&self, metric: Metric) -> Option<f64> {
        self.means.iter().find(|m| m.metric == metric).map(|m| m.mean)
    }
}

/// Parse JSON Lines. Blank lines are skipped; a malformed line fails the
/// whole read with its 1-based line number.
pub fn parse_jsonl(reader: impl BufRead) -> Result<Vec<EvaluationRequest>, EvalError> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|e| EvalError::Dataset(format!("line {}: {e}", i + 1)))?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_dataset(path: &Path) -> Result<Vec<EvaluationRequest>, EvalError> {
    let file = File::open(path)
        .map_err(|e| EvalError::Dataset(format!("{}: {e}", path.display())))?;
    parse_jsonl(BufReader::new(file))
}

pub fn write_rows(mut writer: impl Write, rows: &[BatchRow]) -> Result<(), EvalError> {
    for row in rows {
        serde_json::to_writer(&mut writer, row).map_err(|e| EvalError::Dataset(e.to_string()))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Header of the CSV report after the leading `URL` column.
const LATENCY_COLUMN: &str = "LATENCY";

/// CSV column headers: `URL`, then every metric in [`Metric::ALL`] order
/// with `LATENCY` placed after the semantic score.
pub fn csv_header() -> Vec<&'static str> {
    let mut header = vec!["URL"];
    for metric in Metric::ALL {
        header.push(metric.column());
        if metric == Metric::BertScore {
            header.push(LATENCY_COLUMN);
        }
    }
    header
}

/// Write rows as a CSV report. Failed rows keep their URL and leave every
/// metric cell blank; a metric without a value is blank too. Latency is in
/// seconds with two decimals.
pub fn write_csv(writer: impl Write, rows: &[BatchRow]) -> Result<(), EvalError> {
    let csv_err = |e: csv::Error| EvalError::Dataset(e.to_string());
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(csv_header()).map_err(csv_err)?;

    for row in rows {
        let mut record = vec![row.url.clone().unwrap_or_default()];
        for metric in Metric::ALL {
            record.push(
                row.report
                    .as_ref()
                    .and_then(|r| r.value(metric))
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
            if metric == Metric::BertScore {
                record.push(
                    row.report
                        .as_ref()
                        .map(|r| format!("{:.2}", r.latency_ms as f64 / 1000.0))
                        .unwrap_or_default(),
                );
            }
        }
        out.write_record(&record).map_err(csv_err)?;
    }

    out.flush()?;
    Ok(())
}

/// Evaluate `records` with at most `concurrency` in flight. Output order
/// matches input order.
pub async fn run_batch(
    evaluator: &Evaluator,
    records: Vec<EvaluationRequest>,
    concurrency: usize,
    preview_chars: usize,
) -> Vec<BatchRow> {
    let total = records.len();
    info!(total, concurrency, "Starting batch evaluation");

    let rows: Vec<BatchRow> = stream::iter(records.into_iter().enumerate())
        .map(|(index, request)| async move {
            let original_preview: String = request.original.chars().take(preview_chars).collect();
            match evaluator.evaluate(&request).await {
                Ok(report) => {
                    info!(
                        index = index + 1,
                        total,
                        url = request.url.as_deref().unwrap_or(""),
                        latency_ms = report.latency_ms,
                        "Evaluated record"
                    );
                    BatchRow {
                        index,
                        url: request.url,
                        original_preview,
                        report: Some(report),
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(index = index + 1, total, error = %e, "Record failed");
                    BatchRow {
                        index,
                        url: request.url,
                        original_preview,
                        report: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let failed = rows.iter().filter(|r| r.report.is_none()).count();
    info!(total, failed, "Batch evaluation finished");
    rows
}
