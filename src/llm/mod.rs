//! LLM integration module.
//!
//! Provides an OpenAI-compatible client for LLM API calls and
//! the rubric prompt used for relevance judging.

mod client;
mod prompts;

pub use client::{LlmClient, LlmResponse, Message, Role, TokenUsage};
pub use prompts::Prompts;
