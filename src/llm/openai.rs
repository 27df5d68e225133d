//! OpenAI-compatible chat-completions client
//!
//! Works against api.openai.com and any compatible gateway (LiteLLM proxy,
//! vLLM, Ollama's OpenAI endpoint). Tool results are folded back into the
//! conversation as user-role messages, which keeps the wire format portable
//! across gateways with uneven tool-message support.

use crate::llm::client::{LLMClient, LLMResponse};
use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use crate::utils::config::LlmConfig;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

pub struct OpenAIClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    /// Build a client from config, resolving the API key from the
    /// environment variable the config names.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = crate::utils::config::require_env(&config.api_key_env)?;
        Self::new(
            api_key,
            config.api_base.clone(),
            config.model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    async fn chat(&self, messages: Vec<Value>, tools: &[ToolDefinition]) -> Result<LLMResponse> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });

        if !tools.is_empty() {
            let tool_specs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body["tools"] = Value::Array(tool_specs);
        }

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("LLM request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "LLM returned HTTP {}: {}",
                status, detail
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse LLM response: {}", e)))?;

        Self::parse_completion(&payload)
    }

    fn parse_completion(payload: &Value) -> Result<LLMResponse> {
        let choice = payload
            .get("choices")
            .and_then(|c| c.get(0))
            .ok_or_else(|| AppError::Llm("LLM response contained no choices".to_string()))?;

        let message = choice
            .get("message")
            .ok_or_else(|| AppError::Llm("LLM choice contained no message".to_string()))?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or("")
            .to_string();

        let tool_calls = message
            .get("tool_calls")
            .and_then(|t| t.as_array())
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|call| {
                        let id = call.get("id")?.as_str()?.to_string();
                        let function = call.get("function")?;
                        let name = function.get("name")?.as_str()?.to_string();
                        // Arguments arrive as a JSON-encoded string
                        let arguments = function
                            .get("arguments")
                            .and_then(|a| a.as_str())
                            .and_then(|a| serde_json::from_str(a).ok())
                            .unwrap_or_else(|| json!({}));
                        Some(ToolCall {
                            id,
                            name,
                            arguments,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = choice
            .get("finish_reason")
            .and_then(|f| f.as_str())
            .unwrap_or("stop")
            .to_string();

        Ok(LLMResponse {
            content,
            tool_calls,
            finish_reason,
        })
    }

    fn to_wire_messages(system: &str, messages: &[(String, String)]) -> Vec<Value> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        if !system.is_empty() {
            wire.push(json!({"role": "system", "content": system}));
        }
        for (role, content) in messages {
            match role.as_str() {
                "assistant" => wire.push(json!({"role": "assistant", "content": content})),
                "tool" => wire.push(json!({
                    "role": "user",
                    "content": format!("Tool result:\n{}", content),
                })),
                _ => wire.push(json!({"role": "user", "content": content})),
            }
        }
        wire
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = vec![json!({"role": "user", "content": prompt})];
        Ok(self.chat(messages, &[]).await?.content)
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let messages = vec![
            json!({"role": "system", "content": system}),
            json!({"role": "user", "content": prompt}),
        ];
        Ok(self.chat(messages, &[]).await?.content)
    }

    async fn generate_with_tools(
        &self,
        system: &str,
        messages: &[(String, String)],
        tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        let wire = Self::to_wire_messages(system, messages);
        self.chat(wire, tools).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion_with_tool_calls() {
        let payload = json!({
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "search_repositories",
                            "arguments": "{\"query\": \"dashboard\"}"
                        }
                    }]
                }
            }]
        });

        let response = OpenAIClient::parse_completion(&payload).unwrap();
        assert_eq!(response.finish_reason, "tool_calls");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "search_repositories");
        assert_eq!(response.tool_calls[0].arguments["query"], "dashboard");
    }

    #[test]
    fn test_parse_completion_plain_text() {
        let payload = json!({
            "choices": [{
                "finish_reason": "stop",
                "message": { "content": "two similar projects found" }
            }]
        });

        let response = OpenAIClient::parse_completion(&payload).unwrap();
        assert_eq!(response.content, "two similar projects found");
        assert!(response.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_completion_empty_choices() {
        let payload = json!({"choices": []});
        assert!(OpenAIClient::parse_completion(&payload).is_err());
    }

    #[test]
    fn test_tool_role_folded_into_user_message() {
        let messages = vec![
            ("user".to_string(), "find projects".to_string()),
            ("assistant".to_string(), "searching".to_string()),
            ("tool".to_string(), "{\"results\": []}".to_string()),
        ];
        let wire = OpenAIClient::to_wire_messages("sys", &messages);
        assert_eq!(wire.len(), 4);
        assert_eq!(wire[3]["role"], "user");
        assert!(wire[3]["content"]
            .as_str()
            .unwrap()
            .starts_with("Tool result:"));
    }
}
