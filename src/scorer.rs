//! Judging a ranked result list, one document at a time.

use crate::grade::{Grade, extract_score};
use crate::judge::{JudgeReply, RelevanceJudge, judge_passage};
use crate::types::ResultItem;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum rank position considered. Results beyond this depth are ignored.
pub const EVAL_DEPTH: usize = 10;

/// Titles are cut to this many characters before judging.
pub const MAX_TITLE_CHARS: usize = 200;

/// Descriptions are cut to this many characters before judging.
pub const MAX_PASSAGE_CHARS: usize = 4000;

/// How a document's grade was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgmentOutcome {
    /// The judge replied with a parsable grade.
    Graded,
    /// The judge replied but no grade could be extracted; scored as 0.
    ParseFailure,
    /// The judge call failed; scored as 0.
    JudgeError,
}

/// The grade assigned to the document at one rank position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentJudgment {
    /// Zero-based position in the original ranking.
    pub position: usize,
    pub grade: Grade,
    pub outcome: JudgmentOutcome,
    pub elapsed: Duration,
}

/// Aggregate judgments over one ranked list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetScore {
    /// Sum of all grades.
    pub total: u32,
    /// Document count per grade, indexed by grade value.
    pub histogram: [usize; 4],
    /// Judge calls that failed outright.
    pub errors: usize,
    /// Replies that carried no usable grade.
    pub parse_failures: usize,
    /// Total time spent waiting on the judge.
    pub duration: Duration,
    /// Per-document judgments in original rank order.
    pub judgments: Vec<DocumentJudgment>,
}

impl DatasetScore {
    /// Grades in original rank order.
    pub fn grades(&self) -> Vec<Grade> {
        self.judgments.iter().map(|j| j.grade).collect()
    }

    pub fn documents(&self) -> usize {
        self.judgments.len()
    }

    fn record(&mut self, judgment: DocumentJudgment) {
        self.total += u32::from(judgment.grade.value());
        self.histogram[usize::from(judgment.grade.value())] += 1;
        match judgment.outcome {
            JudgmentOutcome::Graded => {}
            JudgmentOutcome::ParseFailure => self.parse_failures += 1,
            JudgmentOutcome::JudgeError => self.errors += 1,
        }
        self.duration += judgment.elapsed;
        self.judgments.push(judgment);
    }

    /// Restore rank order regardless of the order judgments were recorded in.
    fn finish(mut self) -> Self {
        self.judgments.sort_by_key(|j| j.position);
        self
    }
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Render a result as the passage shown to the judge.
pub fn format_passage(item: &ResultItem) -> String {
    let mut passage = format!(
        "Title: {}\nDescription: {}",
        truncate_chars(item.title.trim(), MAX_TITLE_CHARS),
        truncate_chars(item.description.trim(), MAX_PASSAGE_CHARS)
    );

    if let Some(url) = item.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        passage.push_str("\nURL: ");
        passage.push_str(url);
    }

    passage
}

/// Drives the judge over the head of one ranked list.
pub struct DatasetScorer<'a, J> {
    judge: &'a J,
}

impl<'a, J: RelevanceJudge> DatasetScorer<'a, J> {
    pub fn new(judge: &'a J) -> Self {
        Self { judge }
    }

    /// Judge the first [`EVAL_DEPTH`] results in order.
    ///
    /// Never fails: judge errors and unparsable replies are scored as 0 and
    /// counted separately.
    pub async fn score(&self, query: &str, results: &[ResultItem]) -> DatasetScore {
        let mut score = DatasetScore::default();

        for (position, item) in results.iter().take(EVAL_DEPTH).enumerate() {
            let passage = format_passage(item);
            let outcome = judge_passage(self.judge, query, &passage).await;

            let (grade, kind) = match &outcome.reply {
                JudgeReply::Text(raw) => match extract_score(raw) {
                    Some(grade) => (grade, JudgmentOutcome::Graded),
                    None => {
                        log::debug!(
                            "No grade in judge reply for position {}: {:?}",
                            position,
                            truncate_chars(raw, 120)
                        );
                        (Grade::Irrelevant, JudgmentOutcome::ParseFailure)
                    }
                },
                JudgeReply::Failed(_) => (Grade::Irrelevant, JudgmentOutcome::JudgeError),
            };

            score.record(DocumentJudgment {
                position,
                grade,
                outcome: kind,
                elapsed: outcome.elapsed,
            });
        }

        score.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::judge::MockJudge;

    fn results(titles: &[&str]) -> Vec<ResultItem> {
        titles
            .iter()
            .map(|t| ResultItem::new(*t, format!("About {}", t)))
            .collect()
    }

    /// Grade each passage by the digit after "doc-" in its title.
    fn grade_by_title(_query: &str, passage: &str) -> crate::error::Result<String> {
        let digit = passage
            .split("doc-")
            .nth(1)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('0');
        Ok(format!("Looks fine.\n##final score: {}", digit))
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_format_passage_truncates_and_appends_url() {
        let item = ResultItem::new("t".repeat(500), "d".repeat(5000)).with_url("https://example.com");
        let passage = format_passage(&item);

        let title_line = passage.lines().next().unwrap();
        assert_eq!(title_line.len(), "Title: ".len() + MAX_TITLE_CHARS);
        let desc_line = passage.lines().nth(1).unwrap();
        assert_eq!(desc_line.len(), "Description: ".len() + MAX_PASSAGE_CHARS);
        assert!(passage.ends_with("\nURL: https://example.com"));
    }

    #[test]
    fn test_format_passage_without_url() {
        let passage = format_passage(&ResultItem::new("Pricing", "Plans"));
        assert_eq!(passage, "Title: Pricing\nDescription: Plans");
    }

    #[tokio::test]
    async fn test_score_preserves_rank_order() {
        let judge = MockJudge::new(grade_by_title);
        let scorer = DatasetScorer::new(&judge);

        let score = scorer
            .score("q", &results(&["doc-3", "doc-0", "doc-2", "doc-1"]))
            .await;

        assert_eq!(
            score.grades(),
            vec![Grade::Perfect, Grade::Irrelevant, Grade::Relevant, Grade::Related]
        );
        assert_eq!(score.total, 6);
        assert_eq!(score.histogram, [1, 1, 1, 1]);
        assert_eq!(score.errors, 0);
        assert_eq!(score.parse_failures, 0);
        let positions: Vec<usize> = score.judgments.iter().map(|j| j.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_score_caps_at_eval_depth() {
        let judge = MockJudge::new(grade_by_title);
        let scorer = DatasetScorer::new(&judge);
        let titles: Vec<String> = (0..50).map(|i| format!("doc-{}", i % 4)).collect();
        let items: Vec<ResultItem> = titles.iter().map(|t| ResultItem::new(t.as_str(), "")).collect();

        let score = scorer.score("q", &items).await;

        assert_eq!(score.documents(), EVAL_DEPTH);
        assert_eq!(judge.calls(), EVAL_DEPTH);
        assert_eq!(score.histogram.iter().sum::<usize>(), EVAL_DEPTH);
    }

    #[tokio::test]
    async fn test_short_list_scores_every_item() {
        let judge = MockJudge::new(grade_by_title);
        let score = DatasetScorer::new(&judge)
            .score("q", &results(&["doc-1", "doc-1"]))
            .await;
        assert_eq!(score.documents(), 2);
        assert_eq!(score.total, 2);
    }

    #[tokio::test]
    async fn test_judge_error_mid_dataset_does_not_short_circuit() {
        let judge = MockJudge::new(|query, passage| {
            if passage.contains("doc-broken") {
                Err(EvalError::LlmApi("model overloaded".to_string()))
            } else {
                grade_by_title(query, passage)
            }
        });

        let score = DatasetScorer::new(&judge)
            .score("q", &results(&["doc-3", "doc-broken", "doc-2"]))
            .await;

        assert_eq!(judge.calls(), 3);
        assert_eq!(score.errors, 1);
        assert_eq!(score.parse_failures, 0);
        assert_eq!(
            score.grades(),
            vec![Grade::Perfect, Grade::Irrelevant, Grade::Relevant]
        );
        assert_eq!(score.judgments[1].outcome, JudgmentOutcome::JudgeError);
        assert_eq!(score.histogram[0], 1);
    }

    #[tokio::test]
    async fn test_unparsable_reply_is_not_an_error() {
        let judge = MockJudge::new(|_, _| Ok("I think this is quite relevant.".to_string()));

        let score = DatasetScorer::new(&judge)
            .score("q", &results(&["a", "b"]))
            .await;

        assert_eq!(score.errors, 0);
        assert_eq!(score.parse_failures, 2);
        assert_eq!(score.total, 0);
        assert_eq!(score.histogram, [2, 0, 0, 0]);
        assert!(
            score
                .judgments
                .iter()
                .all(|j| j.outcome == JudgmentOutcome::ParseFailure)
        );
    }

    #[test]
    fn test_score_empty_list_blocking() {
        let judge = MockJudge::new(grade_by_title);
        let score = tokio_test::block_on(DatasetScorer::new(&judge).score("q", &[]));
        assert_eq!(score.documents(), 0);
        assert_eq!(score.duration, Duration::ZERO);
        assert_eq!(judge.calls(), 0);
    }
}
