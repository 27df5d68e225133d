//! Router/planner
//!
//! Turns a user query plus the registry's capability descriptions into a
//! [`RoutingDecision`]. The classification itself is delegated to the LLM;
//! this module only supplies the candidate set, extracts the JSON decision
//! from whatever the model returns, and validates it against the candidates.

use crate::capabilities::prompts::ROUTING_SYSTEM_PROMPT;
use crate::llm::LLMClient;
use crate::types::{AppError, Result, RoutingDecision};
use std::sync::Arc;

pub struct Planner {
    llm: Arc<dyn LLMClient>,
}

impl Planner {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Decide which capabilities should handle the query.
    ///
    /// The returned selection is validated: every name is one of
    /// `candidates`, deduplicated, in the order the model listed them.
    pub async fn decide(
        &self,
        query: &str,
        candidates: &[(String, String)],
    ) -> Result<RoutingDecision> {
        let system = Self::build_system_prompt(candidates);
        let response = self.llm.generate_with_system(&system, query).await?;

        let mut decision = Self::parse_decision(&response)?;
        Self::validate(&decision, candidates)?;

        // Duplicate names would break the one-outcome-per-capability
        // contract downstream.
        let mut seen = std::collections::HashSet::new();
        decision
            .selected_capabilities
            .retain(|name| seen.insert(name.clone()));

        Ok(decision)
    }

    fn build_system_prompt(candidates: &[(String, String)]) -> String {
        let listing = candidates
            .iter()
            .map(|(name, description)| format!("- {}: {}", name, description))
            .collect::<Vec<_>>()
            .join("\n");

        format!("{}\nCapabilities:\n{}", ROUTING_SYSTEM_PROMPT, listing)
    }

    /// Extract the JSON decision object from model output.
    ///
    /// Models wrap JSON in prose or code fences often enough that we scan
    /// for the outermost braces instead of parsing the raw output.
    fn parse_decision(output: &str) -> Result<RoutingDecision> {
        let trimmed = output.trim();

        let candidate = match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(start), Some(end)) if start < end => &trimmed[start..=end],
            _ => {
                return Err(AppError::Llm(format!(
                    "Routing decision contained no JSON object: {}",
                    trimmed
                )));
            }
        };

        serde_json::from_str(candidate).map_err(|e| {
            AppError::Llm(format!("Failed to parse routing decision: {}", e))
        })
    }

    /// An unknown capability name is a routing bug, rejected here rather
    /// than silently ignored.
    fn validate(decision: &RoutingDecision, candidates: &[(String, String)]) -> Result<()> {
        for name in &decision.selected_capabilities {
            if !candidates.iter().any(|(n, _)| n == name) {
                return Err(AppError::Routing(format!(
                    "Routing decision referenced unregistered capability '{}'",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMResponse;
    use crate::types::ToolDefinition;
    use async_trait::async_trait;

    struct ScriptedLLM {
        response: String,
    }

    #[async_trait]
    impl LLMClient for ScriptedLLM {
        async fn generate(&self, _: &str) -> Result<String> {
            Ok(self.response.clone())
        }
        async fn generate_with_system(&self, _: &str, _: &str) -> Result<String> {
            Ok(self.response.clone())
        }
        async fn generate_with_tools(
            &self,
            _: &str,
            _: &[(String, String)],
            _: &[ToolDefinition],
        ) -> Result<LLMResponse> {
            Ok(LLMResponse::text(self.response.clone()))
        }
        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn candidates() -> Vec<(String, String)> {
        vec![
            ("gitlab".to_string(), "gitlab search".to_string()),
            ("github".to_string(), "github search".to_string()),
            ("documents".to_string(), "document search".to_string()),
        ]
    }

    #[test]
    fn test_parse_clean_json() {
        let decision = Planner::parse_decision(
            r#"{"selected_capabilities": ["gitlab", "documents"], "direct_answer": null}"#,
        )
        .unwrap();
        assert_eq!(decision.selected_capabilities, vec!["gitlab", "documents"]);
        assert!(decision.direct_answer.is_none());
    }

    #[test]
    fn test_parse_fenced_json() {
        let output = "Here is my decision:\n```json\n{\"selected_capabilities\": [\"github\"]}\n```";
        let decision = Planner::parse_decision(output).unwrap();
        assert_eq!(decision.selected_capabilities, vec!["github"]);
    }

    #[test]
    fn test_parse_no_json_is_llm_error() {
        let err = Planner::parse_decision("I would use the gitlab capability.").unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[test]
    fn test_validate_rejects_unknown_capability() {
        let decision = RoutingDecision {
            selected_capabilities: vec!["jira".to_string()],
            direct_answer: None,
        };
        let err = Planner::validate(&decision, &candidates()).unwrap_err();
        assert!(matches!(err, AppError::Routing(_)));
        assert!(err.to_string().contains("jira"));
    }

    #[tokio::test]
    async fn test_decide_end_to_end() {
        let planner = Planner::new(std::sync::Arc::new(ScriptedLLM {
            response: r#"{"selected_capabilities": ["gitlab", "gitlab", "github"]}"#.to_string(),
        }));

        let decision = planner.decide("find similar projects", &candidates()).await.unwrap();
        // Duplicates removed, order preserved
        assert_eq!(decision.selected_capabilities, vec!["gitlab", "github"]);
    }

    #[tokio::test]
    async fn test_decide_direct_answer() {
        let planner = Planner::new(std::sync::Arc::new(ScriptedLLM {
            response: r#"{"selected_capabilities": [], "direct_answer": "42"}"#.to_string(),
        }));

        let decision = planner.decide("what is 6*7", &candidates()).await.unwrap();
        assert!(decision.selected_capabilities.is_empty());
        assert_eq!(decision.direct_answer.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_decide_unknown_selection_is_routing_error() {
        let planner = Planner::new(std::sync::Arc::new(ScriptedLLM {
            response: r#"{"selected_capabilities": ["bitbucket"]}"#.to_string(),
        }));

        let err = planner
            .decide("find similar projects", &candidates())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Routing(_)));
    }
}
