use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use summeval_metrics::{CompressionCalculator, CompressionRateInput, Metric};
use summeval_runner::batch::{read_dataset, write_csv, write_rows};
use summeval_runner::{run_batch, BatchSummary, Config, EvaluationRequest, Evaluator};

#[derive(Parser)]
#[command(name = "summeval", about = "Score generated summaries against their source articles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One JSON object per record
    Jsonl,
    /// Spreadsheet report with one column per metric
    Csv,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one summary against its original text
    Score {
        /// File holding the original article text
        #[arg(long)]
        original: PathBuf,
        /// File holding the generated summary
        #[arg(long)]
        summary: PathBuf,
        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Evaluate every record of a JSON Lines dataset
    Batch {
        /// JSON Lines input, one {"original", "summary", "url"?, "usage"?} per line
        #[arg(long)]
        input: PathBuf,
        /// Where to write result rows (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Records evaluated at once (overrides SUMMEVAL_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
        format: OutputFormat,
    },
    /// Token-based compression rate only
    Compression {
        #[arg(long)]
        original: PathBuf,
        #[arg(long)]
        summary: PathBuf,
    },
    /// Describe every recorded metric
    Metrics,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("summeval=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Score { original, summary, json } => {
            config.log_summary();
            let request = EvaluationRequest::new(read_text(&original)?, read_text(&summary)?);
            let evaluator = Evaluator::from_config(&config)?;
            let report = evaluator.evaluate(&request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for metric in Metric::ALL {
                    match report.value(metric) {
                        Some(value) => println!("{:<18} {}", metric.label(), metric.format_value(value)),
                        None => println!("{:<18} -", metric.label()),
                    }
                }
            }
        }
        Command::Batch { input, output, concurrency, format } => {
            config.log_summary();
            let records = read_dataset(&input)?;
            let evaluator = Evaluator::from_config(&config)?;
            let concurrency = concurrency.unwrap_or(config.concurrency);

            let rows = run_batch(&evaluator, records, concurrency, config.preview_chars).await;

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let writer = BufWriter::new(file);
                    match format {
                        OutputFormat::Jsonl => write_rows(writer, &rows)?,
                        OutputFormat::Csv => write_csv(writer, &rows)?,
                    }
                    info!(path = %path.display(), rows = rows.len(), "Results written");
                }
                None => match format {
                    OutputFormat::Jsonl => write_rows(io::stdout().lock(), &rows)?,
                    OutputFormat::Csv => write_csv(io::stdout().lock(), &rows)?,
                },
            }

            let summary = BatchSummary::from_rows(&rows);
            info!(
                total = summary.total,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Batch summary"
            );
            eprintln!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Compression { original, summary } => {
            let calculator = CompressionCalculator::for_encoding(&config.encoding)?;
            let result = calculator.calculate(&CompressionRateInput::new(
                read_text(&original)?,
                read_text(&summary)?,
            ))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Metrics => {
            for metric in Metric::ALL {
                println!("{} ({})\n  {}\n", metric.label(), metric.column(), metric.description());
            }
        }
    }

    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
