//! Head-to-head evaluation of two ranked result lists.
//!
//! The evaluator judges both lists with the same [`RelevanceJudge`], pools
//! their grades to form the ideal ranking, and reports an expected-utility
//! score with a short feedback text for each side.

use crate::config::Config;
use crate::error::Result;
use crate::judge::RelevanceJudge;
use crate::llm::LlmClient;
use crate::metrics::{Metrics, compute_metrics, pooled_ideal};
use crate::scorer::{DatasetScore, DatasetScorer, EVAL_DEPTH};
use crate::types::ResultItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dataset's score, or the fact that it could not be judged.
///
/// Serialized as a bare number; [`Score::UNAVAILABLE`] (-1) stands for
/// `Unavailable` since computed scores are always within 0..=10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum Score {
    Unavailable,
    Computed(f64),
}

impl Score {
    pub const UNAVAILABLE: f64 = -1.0;

    pub fn value(self) -> f64 {
        match self {
            Score::Unavailable => Self::UNAVAILABLE,
            Score::Computed(v) => v,
        }
    }

    pub fn computed(self) -> Option<f64> {
        match self {
            Score::Unavailable => None,
            Score::Computed(v) => Some(v),
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Score::Computed(_))
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        if value < 0.0 {
            Score::Unavailable
        } else {
            Score::Computed(value)
        }
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Unavailable => write!(f, "unavailable"),
            Score::Computed(v) => write!(f, "{:.3}/10", v),
        }
    }
}

/// Outcome for one of the two compared lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub score: Score,
    /// Human-readable summary; empty when judging was unavailable.
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DatasetScore>,
}

impl DatasetReport {
    fn unavailable() -> Self {
        Self {
            score: Score::Unavailable,
            feedback: String::new(),
            metrics: None,
            details: None,
        }
    }

    fn computed(score: DatasetScore, metrics: Metrics) -> Self {
        Self {
            score: Score::Computed(metrics.expected_utility),
            feedback: build_feedback(&score, &metrics),
            metrics: Some(metrics),
            details: Some(score),
        }
    }
}

/// Result of comparing two ranked lists for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub dataset_a: DatasetReport,
    pub dataset_b: DatasetReport,
    /// Total time spent waiting on the judge across both lists.
    pub overall_duration_ms: u64,
}

impl EvaluationReport {
    /// The degraded report returned when no judge is configured.
    pub fn unavailable() -> Self {
        Self {
            dataset_a: DatasetReport::unavailable(),
            dataset_b: DatasetReport::unavailable(),
            overall_duration_ms: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.dataset_a.score.is_available() && self.dataset_b.score.is_available()
    }
}

/// Evaluation options.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Judge both lists at the same time instead of one after the other.
    /// Items within a list are always judged sequentially.
    pub concurrent_datasets: bool,
}

/// Compares two ranked result lists using a relevance judge.
pub struct Evaluator<J> {
    judge: Option<J>,
    options: EvalOptions,
}

impl Evaluator<LlmClient> {
    /// Build an evaluator backed by the configured LLM.
    ///
    /// Without an API base and key the evaluator has no judge and every
    /// evaluation returns [`EvaluationReport::unavailable`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let judge = if config.judge_available() {
            Some(LlmClient::new(config.llm.clone())?)
        } else {
            log::warn!("No LLM judge configured; evaluations will be reported as unavailable");
            None
        };
        Ok(Self::from_optional(judge))
    }
}

impl<J: RelevanceJudge> Evaluator<J> {
    pub fn new(judge: J) -> Self {
        Self::from_optional(Some(judge))
    }

    /// An evaluator with no judge; always reports unavailable.
    pub fn unavailable() -> Self {
        Self::from_optional(None)
    }

    pub fn from_optional(judge: Option<J>) -> Self {
        Self {
            judge,
            options: EvalOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }

    /// Judge both lists and report a score and feedback for each.
    ///
    /// Never fails. Individual judge failures are scored as 0 and called out
    /// in the feedback; a missing judge yields the unavailable report without
    /// making any calls.
    pub async fn evaluate(
        &self,
        query: &str,
        results_a: &[ResultItem],
        results_b: &[ResultItem],
    ) -> EvaluationReport {
        let Some(judge) = &self.judge else {
            return EvaluationReport::unavailable();
        };

        let results_a = &results_a[..results_a.len().min(EVAL_DEPTH)];
        let results_b = &results_b[..results_b.len().min(EVAL_DEPTH)];

        let scorer = DatasetScorer::new(judge);
        let (score_a, score_b) = if self.options.concurrent_datasets {
            tokio::join!(
                scorer.score(query, results_a),
                scorer.score(query, results_b)
            )
        } else {
            let a = scorer.score(query, results_a).await;
            let b = scorer.score(query, results_b).await;
            (a, b)
        };

        let overall = score_a.duration + score_b.duration;

        let grades_a = score_a.grades();
        let grades_b = score_b.grades();
        let ideal = pooled_ideal(&grades_a, &grades_b);
        let metrics_a = compute_metrics(&grades_a, &ideal);
        let metrics_b = compute_metrics(&grades_b, &ideal);

        log::debug!(
            "A: {} docs, {} errors, {} unparsed; B: {} docs, {} errors, {} unparsed",
            score_a.documents(),
            score_a.errors,
            score_a.parse_failures,
            score_b.documents(),
            score_b.errors,
            score_b.parse_failures
        );
        log::info!(
            "Evaluated \"{}\": A = {:.3}, B = {:.3} in {:.2?}",
            query,
            metrics_a.expected_utility,
            metrics_b.expected_utility,
            overall
        );

        EvaluationReport {
            dataset_a: DatasetReport::computed(score_a, metrics_a),
            dataset_b: DatasetReport::computed(score_b, metrics_b),
            overall_duration_ms: u64::try_from(overall.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

fn build_feedback(score: &DatasetScore, metrics: &Metrics) -> String {
    let [zero, one, two, three] = score.histogram;
    let mut feedback = format!(
        "Scored {} documents with a total grade of {}. Grades: 3 = {}, 2 = {}, 1 = {}, 0 = {}. Expected utility: {:.3}/10.",
        score.documents(),
        score.total,
        three,
        two,
        one,
        zero,
        metrics.expected_utility
    );

    if score.errors > 0 {
        feedback.push_str(&format!(
            " Note: {} judge call(s) failed and were scored as 0.",
            score.errors
        ));
    }
    if score.parse_failures > 0 {
        feedback.push_str(&format!(
            " {} judge reply(ies) had no readable grade and were scored as 0.",
            score.parse_failures
        ));
    }

    feedback
}
