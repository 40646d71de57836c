//! Hosted LLM integration
//!
//! The LLM only ranks and picks words; session content is always built from
//! local templates.

pub mod client;
pub mod recommend;

pub use client::{ApiFormat, CompletionRequest, LlmClient};
pub use recommend::{local_recommendations, rank_candidates, recommend_with_fallback, recommend_words};
