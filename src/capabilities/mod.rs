//! Capability adapters
//!
//! A capability is one independently invokable external search source
//! (GitLab projects, GitHub repositories, the document knowledge base).
//! Each is wrapped behind the uniform [`Capability`] contract: ask a
//! natural-language question, get a displayable string back.
//!
//! Errors never cross the capability boundary. Any transport, auth, or
//! backend failure is converted into a sentinel-formatted error string so
//! the dispatcher can treat "adapter returned an error" and "adapter
//! failed internally" uniformly.

pub mod channel;
pub mod documents;
pub mod github;
pub mod gitlab;
pub mod prompts;
pub mod registry;

use crate::llm::LLMClient;
use crate::types::{Result, ToolDefinition};
use async_trait::async_trait;
use channel::ToolChannel;
use std::sync::Arc;

pub use documents::DocumentsCapability;
pub use github::GitHubCapability;
pub use gitlab::GitLabCapability;
pub use registry::CapabilityRegistry;

/// Uniform wrapper around one external search capability.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Unique registry key for this capability
    fn name(&self) -> &str;

    /// Natural-language description handed to the planner for routing
    fn description(&self) -> &str;

    /// Ask the capability a natural-language question.
    ///
    /// Never fails: internal errors come back as a string carrying the
    /// [`error_marker`] prefix for this capability.
    async fn ask(&self, query: &str) -> String;
}

impl std::fmt::Debug for dyn Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name())
            .finish()
    }
}

/// Prefix identifying a contained adapter failure in an `ask` payload.
pub fn error_marker(name: &str) -> String {
    format!("Error in {} assistant:", name)
}

/// Wrap a fallible adapter body into the never-failing `ask` contract.
pub(crate) fn contain_errors(name: &str, result: Result<String>) -> String {
    match result {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(capability = name, error = %e, "capability call failed");
            format!("{} {}", error_marker(name), e)
        }
    }
}

/// Run a tool-calling sub-agent against a connected tool channel.
///
/// The model sees the channel's tool definitions, requested calls are
/// executed through the channel, and their results are fed back until the
/// model answers in plain text or the iteration cap is reached.
pub(crate) async fn run_tool_agent(
    llm: &Arc<dyn LLMClient>,
    system_prompt: &str,
    query: &str,
    channel: &ToolChannel,
    max_iterations: usize,
) -> Result<String> {
    let tools: Vec<ToolDefinition> = channel.list_tools().await?;
    let mut messages: Vec<(String, String)> = vec![("user".to_string(), query.to_string())];

    for _ in 0..max_iterations {
        let response = llm
            .generate_with_tools(system_prompt, &messages, &tools)
            .await?;

        if response.tool_calls.is_empty() {
            return Ok(response.content);
        }

        if !response.content.is_empty() {
            messages.push(("assistant".to_string(), response.content.clone()));
        }

        for call in &response.tool_calls {
            let result = match channel.call_tool(&call.name, call.arguments.clone()).await {
                Ok(value) => value.to_string(),
                // Surface the failure to the model instead of aborting;
                // it can often recover with a different call.
                Err(e) => format!("tool '{}' failed: {}", call.name, e),
            };
            messages.push(("tool".to_string(), format!("{}: {}", call.name, result)));
        }
    }

    // Iteration cap reached: ask for a final answer with tools withheld.
    let response = llm.generate_with_tools(system_prompt, &messages, &[]).await?;
    Ok(response.content)
}
