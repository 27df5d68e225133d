//! Document-store capability adapter
//!
//! Queries a managed knowledge base (embedding retrieval over archived
//! project documents) and has the model summarize the retrieved passages
//! into the structured document-listing answer.

use crate::capabilities::{Capability, contain_errors, prompts};
use crate::llm::LLMClient;
use crate::orchestrator::session::SessionContext;
use crate::types::{AppError, Result};
use crate::utils::config::{DocumentsConfig, require_env};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

pub const NAME: &str = "documents";

const DESCRIPTION: &str =
    "Search and retrieve technical documentation, project specifications, reports, \
     and post-mortems from the company knowledge base.";

const RETRIEVAL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct DocumentsCapability {
    llm: Arc<dyn LLMClient>,
    retrieval_endpoint: String,
    knowledge_base_id: String,
    number_of_results: usize,
    min_score: f64,
    session: SessionContext,
}

impl DocumentsCapability {
    pub fn new(config: &DocumentsConfig, llm: Arc<dyn LLMClient>) -> Result<Self> {
        let knowledge_base_id = require_env(&config.knowledge_base_id_env)?;
        Ok(Self {
            llm,
            retrieval_endpoint: config.retrieval_endpoint.clone(),
            knowledge_base_id,
            number_of_results: config.number_of_results,
            min_score: config.min_score,
            session: SessionContext::new("documents-agent"),
        })
    }

    /// One retrieval round-trip against the knowledge base.
    async fn retrieve(&self, query: &str) -> Result<Vec<Value>> {
        let http = reqwest::Client::builder()
            .timeout(RETRIEVAL_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let response = http
            .post(&self.retrieval_endpoint)
            .json(&json!({
                "knowledgeBaseId": self.knowledge_base_id,
                "text": query,
                "numberOfResults": self.number_of_results,
                "score": self.min_score,
            }))
            .send()
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "Unable to access technical support documentation. Error: {}",
                    e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "Unable to access technical support documentation. Error: HTTP {}",
                status
            )));
        }

        let payload: Value = response.json().await.map_err(|e| {
            AppError::Internal(format!("malformed retrieval response: {}", e))
        })?;

        Ok(payload
            .get("results")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default())
    }

    async fn run(&self, query: &str) -> Result<String> {
        let results = self.retrieve(query).await?;

        if results.is_empty() {
            return Ok(
                "No documents in the knowledge base matched the query above the relevance threshold."
                    .to_string(),
            );
        }

        let passages = results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[{}] {}", i + 1, r))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Query: {}\n\nRetrieved passages:\n{}\n\nList the relevant documents.",
            query, passages
        );

        self.llm
            .generate_with_system(prompts::DOCUMENTS_AGENT_SYSTEM_PROMPT, &prompt)
            .await
    }
}

#[async_trait]
impl Capability for DocumentsCapability {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn ask(&self, query: &str) -> String {
        let span = tracing::info_span!("documents_ask", session_id = %self.session.session_id);
        contain_errors(NAME, self.run(query).instrument(span).await)
    }
}
