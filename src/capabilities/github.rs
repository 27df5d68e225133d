//! GitHub capability adapter
//!
//! Same contract as the GitLab adapter, pointed at a hosted GitHub tool
//! endpoint and authenticated with a bearer token resolved at construction.

use crate::capabilities::channel::ToolChannel;
use crate::capabilities::{Capability, contain_errors, prompts, run_tool_agent};
use crate::llm::LLMClient;
use crate::orchestrator::session::SessionContext;
use crate::types::Result;
use crate::utils::config::{GitHubConfig, require_env};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

pub const NAME: &str = "github";

const DESCRIPTION: &str =
    "Handle GitHub-related queries like repository management, issues, pull requests, \
     and finding similar projects in the company's GitHub organizations.";

pub struct GitHubCapability {
    llm: Arc<dyn LLMClient>,
    tool_endpoint: String,
    token: String,
    max_tool_iterations: usize,
    session: SessionContext,
}

impl GitHubCapability {
    pub fn new(config: &GitHubConfig, llm: Arc<dyn LLMClient>) -> Result<Self> {
        let token = require_env(&config.token_env)?;
        Ok(Self {
            llm,
            tool_endpoint: config.tool_endpoint.clone(),
            token,
            max_tool_iterations: config.max_tool_iterations,
            session: SessionContext::new("github-agent"),
        })
    }

    async fn run(&self, query: &str) -> Result<String> {
        let channel = ToolChannel::connect(&self.tool_endpoint, &self.token)?;

        run_tool_agent(
            &self.llm,
            prompts::GITHUB_AGENT_SYSTEM_PROMPT,
            query,
            &channel,
            self.max_tool_iterations,
        )
        .await
    }
}

#[async_trait]
impl Capability for GitHubCapability {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn ask(&self, query: &str) -> String {
        let span = tracing::info_span!("github_ask", session_id = %self.session.session_id);
        contain_errors(NAME, self.run(query).instrument(span).await)
    }
}
