pub mod batch;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod semantic;
pub mod usage;

pub use batch::{run_batch, BatchRow, BatchSummary};
pub use config::Config;
pub use error::EvalError;
pub use evaluate::{EvaluationReport, EvaluationRequest, Evaluator};
pub use semantic::{NoSemanticScorer, SemanticScorer};
pub use usage::TokenUsage;
