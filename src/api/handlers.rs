use crate::AppState;
use crate::types::{AppError, InvocationRequest, InvocationResponse, Result};
use axum::{Json, extract::State};
use serde_json::{Value, json};
use uuid::Uuid;

/// Route a user prompt through the orchestrator.
pub async fn invoke(
    State(state): State<AppState>,
    Json(payload): Json<InvocationRequest>,
) -> Result<Json<InvocationResponse>> {
    let prompt = payload
        .input
        .get("prompt")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    if prompt.is_empty() {
        return Err(AppError::InvalidInput(
            "No prompt found in input. Please provide a 'prompt' key in the input.".to_string(),
        ));
    }

    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, "invocation received");

    let output = state.orchestrator.handle(prompt).await.map_err(|e| {
        tracing::error!(%request_id, error = %e, "invocation failed");
        match e {
            // Validation errors keep their status; everything else is an
            // internal processing failure from the caller's point of view.
            AppError::InvalidInput(_) => e,
            other => AppError::Internal(format!("Agent processing failed: {}", other)),
        }
    })?;

    Ok(Json(InvocationResponse { output }))
}

/// Liveness probe. Never touches any capability or the LLM.
pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
