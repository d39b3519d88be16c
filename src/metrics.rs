//! Ranking-quality metrics over graded result lists.
//!
//! - [`expected_utility`]: geometrically discounted gain scaled to 0..=10.
//!   This is the reported score.
//! - [`dcg`] / [`ndcg`]: logarithmically discounted gain, normalized against
//!   the best ordering of the grades pooled from both compared lists.
//!
//! All functions take grades in rank order. Positions past the end of a list
//! count as grade 0.

use crate::grade::Grade;
use crate::scorer::EVAL_DEPTH;
use serde::{Deserialize, Serialize};

/// Per-position discount for expected utility.
pub const EU_ALPHA: f64 = 0.9;

/// Exponential gain, `2^grade - 1`.
pub fn gain(grade: Grade) -> f64 {
    grade.gain()
}

/// Discounted cumulative gain over the first `depth` positions.
pub fn dcg(grades: &[Grade], depth: usize) -> f64 {
    grades
        .iter()
        .take(depth)
        .enumerate()
        .map(|(i, g)| gain(*g) / (i as f64 + 2.0).log2())
        .sum()
}

/// DCG normalized by the DCG of `ideal`, or 0 when the ideal has no gain.
pub fn ndcg(grades: &[Grade], ideal: &[Grade], depth: usize) -> f64 {
    let ideal_dcg = dcg(ideal, depth);
    if ideal_dcg == 0.0 {
        0.0
    } else {
        dcg(grades, depth) / ideal_dcg
    }
}

/// Geometrically discounted gain, normalized so that a grade-3 result at every
/// one of the `depth` positions scores exactly 10.
///
/// Missing positions score 0, so short lists are penalized.
pub fn expected_utility(grades: &[Grade], alpha: f64, depth: usize) -> f64 {
    if depth == 0 {
        return 0.0;
    }

    let mut weighted = 0.0;
    let mut weights = 0.0;
    let mut weight = 1.0;
    for i in 0..depth {
        let grade = grades.get(i).copied().unwrap_or(Grade::Irrelevant);
        weighted += weight * gain(grade);
        weights += weight;
        weight *= alpha;
    }

    let max = weights * gain(Grade::Perfect);
    (weighted / max * 10.0).clamp(0.0, 10.0)
}

/// Concatenate both lists' grades and sort them best first.
///
/// The sort is stable, so equal grades keep pool order: the first list's
/// positions come before the second's.
pub fn pooled_ideal(first: &[Grade], second: &[Grade]) -> Vec<Grade> {
    let mut pool: Vec<Grade> = first.iter().chain(second).copied().collect();
    pool.sort_by(|a, b| b.cmp(a));
    pool
}

/// Metrics reported for one ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Primary score, 0..=10.
    pub expected_utility: f64,
    pub ndcg_at_5: f64,
    pub ndcg_at_10: f64,
}

/// Compute all metrics for `grades` against the pooled `ideal` ordering.
pub fn compute_metrics(grades: &[Grade], ideal: &[Grade]) -> Metrics {
    Metrics {
        expected_utility: expected_utility(grades, EU_ALPHA, EVAL_DEPTH),
        ndcg_at_5: ndcg(grades, ideal, 5),
        ndcg_at_10: ndcg(grades, ideal, 10),
    }
}
