//! Result aggregator
//!
//! Folds the dispatch outcomes (and/or the planner's direct answer) into
//! the single response envelope. Semantic merging across capabilities is
//! delegated to the LLM; this module's own job is the mechanical assembly:
//! timestamp, fixed model label, and a guaranteed non-empty message no
//! matter how many capabilities failed.

use crate::capabilities::prompts::SYNTHESIS_SYSTEM_PROMPT;
use crate::llm::LLMClient;
use crate::types::{CallOutcome, ResponseEnvelope, Result};
use chrono::Utc;
use std::sync::Arc;

/// Message used when the planner selected nothing and gave no direct answer.
const UNDECIDED_MESSAGE: &str =
    "I could not determine how to answer this query: no search capability was \
     selected and no direct answer was produced. Please rephrase the question.";

pub struct Aggregator {
    llm: Arc<dyn LLMClient>,
    model_label: String,
}

impl Aggregator {
    pub fn new(llm: Arc<dyn LLMClient>, model_label: String) -> Self {
        Self { llm, model_label }
    }

    /// Build the response envelope for one request.
    pub async fn aggregate(
        &self,
        query: &str,
        outcomes: &[CallOutcome],
        direct_answer: Option<&str>,
    ) -> Result<ResponseEnvelope> {
        let message = self.compose_message(query, outcomes, direct_answer).await?;
        Ok(self.envelope(message))
    }

    async fn compose_message(
        &self,
        query: &str,
        outcomes: &[CallOutcome],
        direct_answer: Option<&str>,
    ) -> Result<String> {
        if outcomes.is_empty() {
            // Nothing was dispatched: either the planner answered directly,
            // or it produced nothing at all.
            return Ok(match direct_answer {
                Some(answer) if !answer.trim().is_empty() => answer.to_string(),
                _ => UNDECIDED_MESSAGE.to_string(),
            });
        }

        if !outcomes.iter().any(CallOutcome::is_success) {
            let reasons = outcomes
                .iter()
                .map(|o| format!("- {}: {}", o.capability, failure_reason(o)))
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(format!(
                "All capability lookups failed for this query.\n{}",
                reasons
            ));
        }

        let mut findings = outcomes
            .iter()
            .map(|o| {
                if o.is_success() {
                    format!("### {}\n{}", o.capability, o.payload)
                } else {
                    format!(
                        "### {}\nLookup failed and returned no findings: {}",
                        o.capability,
                        failure_reason(o)
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        // A direct answer alongside selections is tolerated input: fold it
        // in as one more finding rather than discarding it.
        if let Some(answer) = direct_answer {
            if !answer.trim().is_empty() {
                findings.push_str(&format!("\n\n### direct answer\n{}", answer));
            }
        }

        let prompt = format!(
            "Query: {}\n\nFindings per capability:\n{}",
            query, findings
        );

        self.llm
            .generate_with_system(SYNTHESIS_SYSTEM_PROMPT, &prompt)
            .await
    }

    fn envelope(&self, message: String) -> ResponseEnvelope {
        let message = if message.trim().is_empty() {
            // The model can legitimately return an empty completion; the
            // envelope contract forbids forwarding it.
            "The orchestrator produced no content for this request.".to_string()
        } else {
            message
        };

        ResponseEnvelope {
            message,
            timestamp: Utc::now().to_rfc3339(),
            model: self.model_label.clone(),
        }
    }
}

fn failure_reason(outcome: &CallOutcome) -> String {
    outcome
        .error
        .clone()
        .unwrap_or_else(|| outcome.payload.clone())
}
