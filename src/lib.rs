//! search-arena - head-to-head evaluation of search result lists.
//!
//! Given a query and two ranked result lists (for example from two search
//! providers), an LLM judge grades every document in the head of each list
//! on a 0-3 relevance scale. The grades are turned into a geometrically
//! discounted "expected utility" score on a 0-10 scale, with nDCG against the
//! pooled ideal ranking as a diagnostic.
//!
//! # Quick Start
//!
//! ```no_run
//! use search_arena::{Config, Evaluator, ResultItem};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let evaluator = Evaluator::from_config(&config)?;
//!
//!     let a = vec![ResultItem::new("Pricing", "Plans start at $20/month")
//!         .with_url("https://vercel.com/pricing")];
//!     let b = vec![ResultItem::new("Vercel raises Series E", "Funding news")];
//!
//!     let report = evaluator.evaluate("vercel pricing", &a, &b).await;
//!     println!("A: {}  B: {}", report.dataset_a.score, report.dataset_b.score);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **LlmClient**: OpenAI-compatible API client, the production judge
//! - **RelevanceJudge**: the judge seam; `MockJudge` for tests
//! - **grade**: grade type and score extraction from judge replies
//! - **DatasetScorer**: judges one ranked list, position by position
//! - **metrics**: gain, DCG, nDCG and expected utility
//! - **Evaluator**: compares two lists and builds the report

pub mod batch;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod grade;
pub mod judge;
pub mod llm;
pub mod metrics;
pub mod persistence;
pub mod scorer;
pub mod types;

// Re-export commonly used types
pub use batch::{BatchConfig, BatchResults, BatchRunner};
pub use config::Config;
pub use error::{EvalError, Result};
pub use evaluator::{EvalOptions, EvaluationReport, Evaluator, Score};
pub use grade::{Grade, extract_score};
pub use judge::{MockJudge, RelevanceJudge};
pub use llm::LlmClient;
pub use persistence::{ComparisonCase, load_case, load_cases, save_report};
pub use scorer::{DatasetScore, DatasetScorer, EVAL_DEPTH};
pub use types::ResultItem;
