//! TOML-based configuration for the scout server
//!
//! Infrastructure settings live in `scout.toml`. Secrets are never stored in
//! the file itself; the TOML names the *environment variable* that holds the
//! credential and the value is resolved at startup (after `dotenvy` has
//! loaded any `.env` file).

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure loaded from scout.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
}

impl ScoutConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            AppError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= LLM Configuration =============

/// OpenAI-compatible chat-completions endpoint used by the planner, the
/// aggregator, and the capability sub-agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable name containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_llm_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "SCOUT_LLM_API_KEY".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            request_timeout_secs: default_llm_timeout_secs(),
        }
    }
}

// ============= Orchestrator Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Fixed label reported in every response envelope
    #[serde(default = "default_model_label")]
    pub model_label: String,

    #[serde(default = "default_decide_timeout_secs")]
    pub decide_timeout_secs: u64,

    /// Budget for each individual capability call
    #[serde(default = "default_per_call_timeout_secs")]
    pub per_call_timeout_secs: u64,

    /// Budget for the whole dispatch fan-out
    #[serde(default = "default_overall_deadline_secs")]
    pub overall_deadline_secs: u64,

    #[serde(default = "default_synthesize_timeout_secs")]
    pub synthesize_timeout_secs: u64,
}

fn default_model_label() -> String {
    "scout-orchestrator".to_string()
}

fn default_decide_timeout_secs() -> u64 {
    30
}

fn default_per_call_timeout_secs() -> u64 {
    45
}

fn default_overall_deadline_secs() -> u64 {
    90
}

fn default_synthesize_timeout_secs() -> u64 {
    30
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            model_label: default_model_label(),
            decide_timeout_secs: default_decide_timeout_secs(),
            per_call_timeout_secs: default_per_call_timeout_secs(),
            overall_deadline_secs: default_overall_deadline_secs(),
            synthesize_timeout_secs: default_synthesize_timeout_secs(),
        }
    }
}

// ============= Capability Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    #[serde(default)]
    pub gitlab: GitLabConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub documents: DocumentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Remote tool-serving endpoint for GitLab operations
    #[serde(default = "default_gitlab_tool_endpoint")]
    pub tool_endpoint: String,

    /// GitLab REST API base forwarded to the tool server
    #[serde(default = "default_gitlab_api_url")]
    pub api_url: String,

    /// Environment variable name containing the personal access token
    #[serde(default = "default_gitlab_token_env")]
    pub token_env: String,

    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_gitlab_tool_endpoint() -> String {
    "http://localhost:8181/mcp".to_string()
}

fn default_gitlab_api_url() -> String {
    "https://gitlab.com/api/v4".to_string()
}

fn default_gitlab_token_env() -> String {
    "GITLAB_PERSONAL_ACCESS_TOKEN".to_string()
}

fn default_max_tool_iterations() -> usize {
    6
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            tool_endpoint: default_gitlab_tool_endpoint(),
            api_url: default_gitlab_api_url(),
            token_env: default_gitlab_token_env(),
            max_tool_iterations: default_max_tool_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_github_tool_endpoint")]
    pub tool_endpoint: String,

    /// Environment variable name containing the access token
    #[serde(default = "default_github_token_env")]
    pub token_env: String,

    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: usize,
}

fn default_github_tool_endpoint() -> String {
    "https://api.githubcopilot.com/mcp/".to_string()
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            tool_endpoint: default_github_tool_endpoint(),
            token_env: default_github_token_env(),
            max_tool_iterations: default_max_tool_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Managed knowledge-base retrieval endpoint
    #[serde(default = "default_retrieval_endpoint")]
    pub retrieval_endpoint: String,

    /// Environment variable name containing the knowledge-base identifier
    #[serde(default = "default_kb_id_env")]
    pub knowledge_base_id_env: String,

    #[serde(default = "default_number_of_results")]
    pub number_of_results: usize,

    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

fn default_retrieval_endpoint() -> String {
    "http://localhost:8282/retrieve".to_string()
}

fn default_kb_id_env() -> String {
    "SCOUT_KNOWLEDGE_BASE_ID".to_string()
}

fn default_number_of_results() -> usize {
    3
}

fn default_min_score() -> f64 {
    0.4
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            retrieval_endpoint: default_retrieval_endpoint(),
            knowledge_base_id_env: default_kb_id_env(),
            number_of_results: default_number_of_results(),
            min_score: default_min_score(),
        }
    }
}

/// Resolve a credential named by an environment variable, failing with a
/// descriptive ConfigurationError when it is absent or empty.
pub fn require_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Configuration(format!(
            "{} environment variable is required",
            var
        ))),
    }
}
