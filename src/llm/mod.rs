//! LLM client abstractions
//!
//! The orchestrator treats the reasoning model as an injected dependency
//! behind the [`LLMClient`] trait so tests can substitute a deterministic
//! stub. The only shipped implementation speaks the OpenAI-compatible
//! chat-completions protocol over HTTP.

pub mod client;
pub mod openai;

pub use client::{LLMClient, LLMResponse};
pub use openai::OpenAIClient;
