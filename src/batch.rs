//! Batch runner for evaluating many comparison cases.

use crate::evaluator::{EvaluationReport, Evaluator};
use crate::judge::RelevanceJudge;
use crate::persistence::ComparisonCase;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Score differences smaller than this count as a tie (the feedback resolution).
pub const TIE_EPSILON: f64 = 0.001;

/// Configuration for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Maximum cases to evaluate (for quick testing).
    pub max_cases: Option<usize>,
    /// Log each case's scores as it completes.
    pub verbose: bool,
}

/// Which side of a comparison scored higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
}

/// Results for a single case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub name: String,
    pub query: String,
    /// `None` when judging was unavailable.
    pub winner: Option<Winner>,
    pub report: EvaluationReport,
}

impl CaseResult {
    fn new(case: &ComparisonCase, report: EvaluationReport) -> Self {
        Self {
            name: case.label().to_string(),
            query: case.query.clone(),
            winner: winner(&report),
            report,
        }
    }
}

/// Decide the winner of one report, or `None` if either side is unavailable.
pub fn winner(report: &EvaluationReport) -> Option<Winner> {
    let a = report.dataset_a.score.computed()?;
    let b = report.dataset_b.score.computed()?;
    Some(if (a - b).abs() < TIE_EPSILON {
        Winner::Tie
    } else if a > b {
        Winner::A
    } else {
        Winner::B
    })
}

/// Aggregated batch results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Total cases evaluated.
    pub total_cases: usize,
    /// Cases where list A scored higher.
    pub wins_a: usize,
    /// Cases where list B scored higher.
    pub wins_b: usize,
    pub ties: usize,
    /// Cases that could not be judged.
    pub unavailable: usize,
    /// Average score for list A over judged cases.
    pub avg_score_a: f64,
    /// Average score for list B over judged cases.
    pub avg_score_b: f64,
    /// Average judge time per case (ms).
    pub avg_duration_ms: f64,
    /// Individual case results.
    pub case_results: Vec<CaseResult>,
    /// Total batch time (seconds).
    pub total_time_secs: f64,
}

impl BatchResults {
    /// Create empty results.
    pub fn new() -> Self {
        Self {
            total_cases: 0,
            wins_a: 0,
            wins_b: 0,
            ties: 0,
            unavailable: 0,
            avg_score_a: 0.0,
            avg_score_b: 0.0,
            avg_duration_ms: 0.0,
            case_results: Vec::new(),
            total_time_secs: 0.0,
        }
    }

    /// Calculate summary statistics from case results.
    pub fn calculate_summary(&mut self) {
        self.total_cases = self.case_results.len();
        self.wins_a = 0;
        self.wins_b = 0;
        self.ties = 0;
        self.unavailable = 0;

        let mut scores_a = Vec::new();
        let mut scores_b = Vec::new();
        let mut durations = Vec::new();

        for result in &self.case_results {
            match result.winner {
                Some(Winner::A) => self.wins_a += 1,
                Some(Winner::B) => self.wins_b += 1,
                Some(Winner::Tie) => self.ties += 1,
                None => {
                    self.unavailable += 1;
                    continue;
                }
            }

            scores_a.extend(result.report.dataset_a.score.computed());
            scores_b.extend(result.report.dataset_b.score.computed());
            durations.push(result.report.overall_duration_ms as f64);
        }

        self.avg_score_a = mean(&scores_a);
        self.avg_score_b = mean(&scores_b);
        self.avg_duration_ms = mean(&durations);
    }

    fn share(&self, count: usize) -> f64 {
        if self.total_cases > 0 {
            count as f64 / self.total_cases as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Print summary to stdout.
    pub fn print_summary(&self) {
        println!("\n========== Comparison Results ==========");
        println!("Total cases: {}", self.total_cases);
        println!("----------------------------------------");
        println!("A wins:      {} ({:.1}%)", self.wins_a, self.share(self.wins_a));
        println!("B wins:      {} ({:.1}%)", self.wins_b, self.share(self.wins_b));
        println!("Ties:        {} ({:.1}%)", self.ties, self.share(self.ties));
        if self.unavailable > 0 {
            println!(
                "Unavailable: {} ({:.1}%)",
                self.unavailable,
                self.share(self.unavailable)
            );
        }
        println!("----------------------------------------");
        println!("Avg A score: {:.3}/10", self.avg_score_a);
        println!("Avg B score: {:.3}/10", self.avg_score_b);
        println!("----------------------------------------");
        println!("Avg judge time per case: {:.0}ms", self.avg_duration_ms);
        println!("Total time: {:.1}s", self.total_time_secs);
        println!("========================================\n");
    }
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Runs an evaluator over a list of cases, one after another.
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub async fn run<J: RelevanceJudge>(
        &self,
        evaluator: &Evaluator<J>,
        cases: &[ComparisonCase],
    ) -> BatchResults {
        let start_time = Instant::now();
        let mut results = BatchResults::new();

        let limit = self.config.max_cases.unwrap_or(cases.len());
        let cases = &cases[..limit.min(cases.len())];
        log::info!("Running comparison on {} cases", cases.len());

        for (idx, case) in cases.iter().enumerate() {
            let report = evaluator
                .evaluate(&case.query, &case.results_a, &case.results_b)
                .await;
            let result = CaseResult::new(case, report);

            if self.config.verbose {
                log::info!(
                    "[{}/{}] {}: A {} vs B {}",
                    idx + 1,
                    cases.len(),
                    result.name,
                    result.report.dataset_a.score,
                    result.report.dataset_b.score
                );
            }

            results.case_results.push(result);
        }

        results.total_time_secs = start_time.elapsed().as_secs_f64();
        results.calculate_summary();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::evaluator::{DatasetReport, Score};
    use crate::judge::MockJudge;
    use crate::types::ResultItem;

    fn report(a: Score, b: Score, duration_ms: u64) -> EvaluationReport {
        let side = |score| DatasetReport {
            score,
            feedback: String::new(),
            metrics: None,
            details: None,
        };
        EvaluationReport {
            dataset_a: side(a),
            dataset_b: side(b),
            overall_duration_ms: duration_ms,
        }
    }

    fn case_result(name: &str, report: EvaluationReport) -> CaseResult {
        CaseResult {
            name: name.to_string(),
            query: name.to_string(),
            winner: winner(&report),
            report,
        }
    }

    #[test]
    fn test_winner() {
        assert_eq!(
            winner(&report(Score::Computed(5.0), Score::Computed(3.0), 0)),
            Some(Winner::A)
        );
        assert_eq!(
            winner(&report(Score::Computed(1.0), Score::Computed(3.0), 0)),
            Some(Winner::B)
        );
        assert_eq!(
            winner(&report(Score::Computed(2.0), Score::Computed(2.0004), 0)),
            Some(Winner::Tie)
        );
        assert_eq!(winner(&EvaluationReport::unavailable()), None);
    }

    #[test]
    fn test_batch_results_summary() {
        let mut results = BatchResults::new();
        results.case_results.push(case_result(
            "1",
            report(Score::Computed(6.0), Score::Computed(2.0), 100),
        ));
        results.case_results.push(case_result(
            "2",
            report(Score::Computed(3.0), Score::Computed(5.0), 200),
        ));
        results
            .case_results
            .push(case_result("3", EvaluationReport::unavailable()));

        results.calculate_summary();

        assert_eq!(results.total_cases, 3);
        assert_eq!(results.wins_a, 1);
        assert_eq!(results.wins_b, 1);
        assert_eq!(results.ties, 0);
        assert_eq!(results.unavailable, 1);
        assert!((results.avg_score_a - 4.5).abs() < 0.01);
        assert!((results.avg_score_b - 3.5).abs() < 0.01);
        assert!((results.avg_duration_ms - 150.0).abs() < 0.01);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let mut results = BatchResults::new();
        results.case_results.push(case_result(
            "1",
            report(Score::Computed(4.0), Score::Computed(4.0), 10),
        ));
        results.calculate_summary();
        results.calculate_summary();
        assert_eq!(results.ties, 1);
        assert_eq!(results.total_cases, 1);
    }

    #[tokio::test]
    async fn test_runner_respects_max_cases() {
        fn always_two(_: &str, _: &str) -> Result<String> {
            Ok("##final score: 2".to_string())
        }
        let judge = MockJudge::new(always_two);
        let evaluator = Evaluator::new(&judge);

        let cases: Vec<ComparisonCase> = (0..4)
            .map(|i| {
                ComparisonCase::new(
                    format!("query {}", i),
                    vec![ResultItem::new("a", "")],
                    vec![ResultItem::new("b", ""), ResultItem::new("c", "")],
                )
            })
            .collect();

        let runner = BatchRunner::new(BatchConfig {
            max_cases: Some(2),
            verbose: true,
        });
        let results = runner.run(&evaluator, &cases).await;

        assert_eq!(results.total_cases, 2);
        assert_eq!(results.wins_b, 2);
        assert_eq!(judge.calls(), 2 * 3);
        assert_eq!(results.case_results[0].name, "query 0");
    }
}
