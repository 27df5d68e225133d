//! Capability registry
//!
//! Maps capability names to their adapters plus the routing descriptions
//! the planner sees. Built once at process start and read-only afterwards,
//! which makes unsynchronized concurrent reads from the dispatch fan-out
//! safe.

use crate::capabilities::{
    Capability, DocumentsCapability, GitHubCapability, GitLabCapability,
};
use crate::llm::LLMClient;
use crate::types::{AppError, Result};
use crate::utils::config::CapabilitiesConfig;
use std::sync::Arc;

pub struct CapabilityRegistry {
    /// Registration order is preserved; `list()` order drives prompt
    /// construction and must stay deterministic.
    entries: Vec<Arc<dyn Capability>>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build the registry from configuration.
    ///
    /// A capability whose construction fails (typically a missing
    /// credential) is logged and skipped; the others remain usable.
    pub fn from_config(config: &CapabilitiesConfig, llm: Arc<dyn LLMClient>) -> Self {
        let mut registry = Self::new();

        if config.gitlab.enabled {
            match GitLabCapability::new(&config.gitlab, Arc::clone(&llm)) {
                Ok(cap) => registry.register(Arc::new(cap)),
                Err(e) => tracing::warn!(capability = "gitlab", error = %e, "capability disabled"),
            }
        }

        if config.github.enabled {
            match GitHubCapability::new(&config.github, Arc::clone(&llm)) {
                Ok(cap) => registry.register(Arc::new(cap)),
                Err(e) => tracing::warn!(capability = "github", error = %e, "capability disabled"),
            }
        }

        if config.documents.enabled {
            match DocumentsCapability::new(&config.documents, Arc::clone(&llm)) {
                Ok(cap) => registry.register(Arc::new(cap)),
                Err(e) => {
                    tracing::warn!(capability = "documents", error = %e, "capability disabled")
                }
            }
        }

        registry
    }

    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        self.entries.push(capability);
    }

    /// Resolve a capability by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Capability>> {
        self.entries
            .iter()
            .find(|c| c.name() == name)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("Capability '{}' is not registered", name))
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|c| c.name() == name)
    }

    /// Ordered (name, description) pairs for the planner.
    pub fn list(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|c| (c.name().to_string(), c.description().to_string()))
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeCapability {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait]
    impl Capability for FakeCapability {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            self.description
        }
        async fn ask(&self, _query: &str) -> String {
            "ok".to_string()
        }
    }

    fn fake(name: &'static str, description: &'static str) -> Arc<dyn Capability> {
        Arc::new(FakeCapability { name, description })
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = CapabilityRegistry::new();
        registry.register(fake("gitlab", "gitlab search"));
        registry.register(fake("documents", "doc search"));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("gitlab"));
        assert!(!registry.contains("github"));
        assert_eq!(registry.resolve("documents").unwrap().name(), "documents");
    }

    #[test]
    fn test_resolve_unknown_is_not_found() {
        let registry = CapabilityRegistry::new();
        let err = registry.resolve("github").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("github"));
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let mut registry = CapabilityRegistry::new();
        registry.register(fake("b", "second registered first"));
        registry.register(fake("a", "first alphabetically"));

        let listed: Vec<String> = registry.list().into_iter().map(|(n, _)| n).collect();
        assert_eq!(listed, vec!["b", "a"]);
    }

    #[test]
    fn test_from_config_skips_capabilities_missing_credentials() {
        use crate::llm::{LLMClient, LLMResponse};
        use crate::types::{Result, ToolDefinition};
        use crate::utils::config::CapabilitiesConfig;

        struct NoopLLM;

        #[async_trait]
        impl LLMClient for NoopLLM {
            async fn generate(&self, _: &str) -> Result<String> {
                Ok(String::new())
            }
            async fn generate_with_system(&self, _: &str, _: &str) -> Result<String> {
                Ok(String::new())
            }
            async fn generate_with_tools(
                &self,
                _: &str,
                _: &[(String, String)],
                _: &[ToolDefinition],
            ) -> Result<LLMResponse> {
                Ok(LLMResponse::text(""))
            }
            fn model_name(&self) -> &str {
                "noop"
            }
        }

        let mut config = CapabilitiesConfig::default();
        // Point every credential at a variable that cannot exist
        config.gitlab.token_env = "SCOUT_TEST_MISSING_GITLAB_TOKEN".to_string();
        config.github.token_env = "SCOUT_TEST_MISSING_GITHUB_TOKEN".to_string();
        config.documents.knowledge_base_id_env = "SCOUT_TEST_MISSING_KB_ID".to_string();

        let registry = CapabilityRegistry::from_config(&config, Arc::new(NoopLLM));
        assert!(registry.is_empty());
    }
}
