use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// ============= API Request/Response Types =============

/// Inbound body for `POST /invocations`.
///
/// The input map must carry a non-empty `prompt` key; everything else is
/// ignored so callers can attach extra metadata without breaking the contract.
#[derive(Debug, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub input: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub output: ResponseEnvelope,
}

/// The single externally visible output shape, built exactly once per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub message: String,
    /// RFC 3339 / ISO-8601 UTC timestamp of envelope construction.
    pub timestamp: String,
    /// Fixed label identifying the orchestrator, not the underlying model.
    pub model: String,
}

// ============= Orchestration Types =============

/// Outcome of the routing decision for one query.
///
/// Produced by the planner from LLM output. An empty selection with no
/// direct answer is a valid (if degenerate) decision the aggregator must
/// handle; both present at once is tolerated as well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingDecision {
    #[serde(default)]
    pub selected_capabilities: Vec<String>,
    #[serde(default)]
    pub direct_answer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Success,
    Failure,
    Timeout,
}

/// Per-capability result of one dispatched call.
///
/// Exactly one of these exists per selected capability, even when the call
/// timed out or panicked.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub capability: String,
    pub status: CallStatus,
    /// Answer text (possibly embedding capability-specific JSON) on success,
    /// or a displayable error string otherwise.
    pub payload: String,
    pub error: Option<String>,
    pub latency: Duration,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        self.status == CallStatus::Success
    }
}

// ============= Tool Types =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing credential/identifier at startup or capability construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM error: {0}")]
    Llm(String),

    /// A routing decision referenced a capability the registry doesn't know.
    #[error("Routing error: {0}")]
    Routing(String),

    /// A non-recoverable stage (decide/synthesize) exceeded its deadline.
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, detail) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Configuration(msg)
            | AppError::Llm(msg)
            | AppError::Routing(msg)
            | AppError::Timeout(msg)
            | AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({ "detail": detail });
        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_routing_decision_tolerates_partial_json() {
        let decision: RoutingDecision = serde_json::from_str("{}").unwrap();
        assert!(decision.selected_capabilities.is_empty());
        assert!(decision.direct_answer.is_none());

        let decision: RoutingDecision =
            serde_json::from_str(r#"{"selected_capabilities": ["gitlab"]}"#).unwrap();
        assert_eq!(decision.selected_capabilities, vec!["gitlab"]);
    }

    #[test]
    fn test_error_status_mapping() {
        let resp = AppError::InvalidInput("bad prompt".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Routing("unknown capability".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = AppError::Timeout("decide".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
