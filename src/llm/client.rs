use crate::types::{Result, ToolCall, ToolDefinition};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// All reasoning calls in the crate (routing decisions, capability
/// sub-agents, result synthesis) go through this trait.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a bare prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with a system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate with tool calling support over a running conversation.
    ///
    /// `messages` is a sequence of (role, content) pairs; roles are
    /// "user", "assistant", or "tool" (a tool result being fed back).
    async fn generate_with_tools(
        &self,
        system: &str,
        messages: &[(String, String)],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an LLM generation request
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "length")
    pub finish_reason: String,
}

impl LLMResponse {
    /// A plain text response with no tool calls
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: vec![],
            finish_reason: "stop".to_string(),
        }
    }
}
