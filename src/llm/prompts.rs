//! Prompts sent to the relevance judge.

/// Collection of prompts used for relevance judging.
pub struct Prompts;

impl Prompts {
    /// Graded relevance rubric for one (query, passage) pair.
    ///
    /// Placeholders: `{query}`, `{passage}`. The reply must end with the
    /// `##final score: <n>` line parsed by [`crate::grade::extract_score`].
    pub fn relevance_judgment() -> &'static str {
        r#"You are a search quality rater evaluating the relevance of a web search result.

Given a query and a search result, you must provide a score on an integer scale of 0 to 3 with the following meanings:

3 = Perfectly relevant: the result is dedicated to the query and contains the exact answer.
2 = Highly relevant: the result has some answer for the query, but the answer may be a bit unclear or hidden amongst extraneous information.
1 = Related: the result seems related to the query but does not answer it.
0 = Irrelevant: the result has nothing to do with the query.

Query:
{query}

Search result:
{passage}

Consider the intent of the query, how well the result matches that intent, and whether a user would be satisfied landing on this result.

Respond ONLY with the final score on the last line in exactly this format:
##final score: <0, 1, 2 or 3>"#
    }

    /// System prompt for the relevance judge.
    pub fn system_relevance_judge() -> &'static str {
        "You are an impartial search relevance judge. Follow the output format exactly and do not add commentary after the final score."
    }

    /// Render the judgment prompt for a query and a formatted passage.
    pub fn render_relevance_judgment(query: &str, passage: &str) -> String {
        Self::relevance_judgment()
            .replace("{query}", query)
            .replace("{passage}", passage)
    }
}
