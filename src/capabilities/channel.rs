//! Remote tool channel
//!
//! The code-host capabilities reach their backends through a tool-serving
//! endpoint speaking a JSON-RPC-shaped protocol: `tools/list` enumerates
//! the available operations, `tools/call` invokes one. The channel is
//! authenticated with a bearer credential and scoped to a single `ask`
//! call; nothing is held open between invocations.

use crate::types::{AppError, Result, ToolDefinition};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

const CHANNEL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ToolChannel {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    /// Extra headers forwarded to the tool server (e.g. the API base URL
    /// the server should target).
    extra_headers: HashMap<String, String>,
    next_id: std::sync::atomic::AtomicU64,
}

impl ToolChannel {
    pub fn connect(endpoint: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(CHANNEL_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build tool channel: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            extra_headers: HashMap::new(),
            next_id: std::sync::atomic::AtomicU64::new(1),
        })
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers.insert(name.to_string(), value.to_string());
        self
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let mut req = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body);
        for (name, value) in &self.extra_headers {
            req = req.header(name, value);
        }

        let response = req
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("tool channel request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "tool channel returned HTTP {}",
                status
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("malformed tool channel response: {}", e)))?;

        if let Some(error) = payload.get("error") {
            return Err(AppError::Internal(format!(
                "tool channel error: {}",
                error
            )));
        }

        payload
            .get("result")
            .cloned()
            .ok_or_else(|| AppError::Internal("tool channel response missing result".to_string()))
    }

    /// Enumerate the tools the remote endpoint serves.
    pub async fn list_tools(&self) -> Result<Vec<ToolDefinition>> {
        let result = self.request("tools/list", json!({})).await?;

        let tools = result
            .get("tools")
            .and_then(|t| t.as_array())
            .ok_or_else(|| {
                AppError::Internal("tool channel listed no tools".to_string())
            })?;

        Ok(tools
            .iter()
            .filter_map(|tool| {
                Some(ToolDefinition {
                    name: tool.get("name")?.as_str()?.to_string(),
                    description: tool
                        .get("description")
                        .and_then(|d| d.as_str())
                        .unwrap_or("")
                        .to_string(),
                    parameters: tool
                        .get("inputSchema")
                        .cloned()
                        .unwrap_or_else(|| json!({"type": "object"})),
                })
            })
            .collect())
    }

    /// Invoke one remote tool and return its raw result value.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value> {
        self.request(
            "tools/call",
            json!({"name": name, "arguments": arguments}),
        )
        .await
    }
}
