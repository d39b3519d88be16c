//! The relevance judge seam.
//!
//! [`RelevanceJudge`] is the text-in/text-out capability the evaluator
//! depends on. [`LlmClient`] implements it against a live model;
//! [`MockJudge`] implements it with a closure for tests and dry runs.
//! [`judge_passage`] wraps a single call so that failures become values.

use crate::error::Result;
use crate::llm::{LlmClient, Prompts};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Something that can grade one passage against one query.
///
/// One call sends exactly one request. Implementations must not batch,
/// retry or cache; the caller accounts for every call.
pub trait RelevanceJudge: Send + Sync {
    /// Return the judge's raw reply for the given query and passage.
    fn judge(&self, query: &str, passage: &str) -> impl Future<Output = Result<String>> + Send;
}

impl<J: RelevanceJudge> RelevanceJudge for &J {
    fn judge(&self, query: &str, passage: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).judge(query, passage)
    }
}

impl RelevanceJudge for LlmClient {
    fn judge(&self, query: &str, passage: &str) -> impl Future<Output = Result<String>> + Send {
        let prompt = Prompts::render_relevance_judgment(query, passage);
        async move {
            self.complete(Some(Prompts::system_relevance_judge()), &prompt)
                .await
        }
    }
}

/// What came back from one judge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgeReply {
    /// The judge answered; the text may or may not carry a usable score.
    Text(String),
    /// The call itself failed (transport, API or model error).
    Failed(String),
}

/// A judge reply together with the time the call took.
#[derive(Debug, Clone)]
pub struct JudgeOutcome {
    pub reply: JudgeReply,
    /// Measured from call start to completion or failure.
    pub elapsed: Duration,
}

/// Run one judge call, converting any error into [`JudgeReply::Failed`].
pub async fn judge_passage<J: RelevanceJudge>(judge: &J, query: &str, passage: &str) -> JudgeOutcome {
    let start = Instant::now();
    let reply = match judge.judge(query, passage).await {
        Ok(text) => JudgeReply::Text(text),
        Err(e) => {
            log::warn!("Judge call failed: {}", e);
            JudgeReply::Failed(e.to_string())
        }
    };

    JudgeOutcome {
        reply,
        elapsed: start.elapsed(),
    }
}

/// A judge backed by a closure.
///
/// The closure receives the query and the formatted passage. Calls are
/// counted so tests can assert how many judgments were requested.
pub struct MockJudge<F>
where
    F: Fn(&str, &str) -> Result<String> + Send + Sync,
{
    responder: F,
    calls: AtomicUsize,
}

impl<F> MockJudge<F>
where
    F: Fn(&str, &str) -> Result<String> + Send + Sync,
{
    pub fn new(responder: F) -> Self {
        Self {
            responder,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of judge calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<F> RelevanceJudge for MockJudge<F>
where
    F: Fn(&str, &str) -> Result<String> + Send + Sync,
{
    fn judge(&self, query: &str, passage: &str) -> impl Future<Output = Result<String>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready((self.responder)(query, passage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;

    #[tokio::test]
    async fn test_judge_passage_returns_text() {
        let judge = MockJudge::new(|query, passage| {
            Ok(format!("{} / {}\n##final score: 2", query, passage))
        });

        let outcome = judge_passage(&judge, "rust async", "Title: Tokio").await;
        assert_eq!(
            outcome.reply,
            JudgeReply::Text("rust async / Title: Tokio\n##final score: 2".to_string())
        );
        assert_eq!(judge.calls(), 1);
    }

    #[tokio::test]
    async fn test_judge_passage_isolates_failure() {
        let judge = MockJudge::new(|_, _| Err(EvalError::Http("connection reset".to_string())));

        let outcome = judge_passage(&judge, "q", "p").await;
        match outcome.reply {
            JudgeReply::Failed(message) => assert!(message.contains("connection reset")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(judge.calls(), 1);
    }
}
