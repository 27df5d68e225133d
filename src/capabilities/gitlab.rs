//! GitLab capability adapter
//!
//! Searches the company's GitLab instance through a remote tool channel.
//! The personal access token is resolved once at construction; a missing
//! token is a ConfigurationError and the capability is not registered.

use crate::capabilities::channel::ToolChannel;
use crate::capabilities::{Capability, contain_errors, prompts, run_tool_agent};
use crate::llm::LLMClient;
use crate::orchestrator::session::SessionContext;
use crate::types::Result;
use crate::utils::config::{GitLabConfig, require_env};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

pub const NAME: &str = "gitlab";

const DESCRIPTION: &str =
    "Handle GitLab-related queries like repository management, issues, merge requests, \
     and finding similar projects on the company GitLab instance.";

pub struct GitLabCapability {
    llm: Arc<dyn LLMClient>,
    tool_endpoint: String,
    api_url: String,
    token: String,
    max_tool_iterations: usize,
    session: SessionContext,
}

impl GitLabCapability {
    pub fn new(config: &GitLabConfig, llm: Arc<dyn LLMClient>) -> Result<Self> {
        let token = require_env(&config.token_env)?;
        Ok(Self {
            llm,
            tool_endpoint: config.tool_endpoint.clone(),
            api_url: config.api_url.clone(),
            token,
            max_tool_iterations: config.max_tool_iterations,
            session: SessionContext::new("gitlab-agent"),
        })
    }

    async fn run(&self, query: &str) -> Result<String> {
        // Connection is scoped to this call; nothing is held between asks.
        let channel = ToolChannel::connect(&self.tool_endpoint, &self.token)?
            .with_header("X-Gitlab-Api-Url", &self.api_url);

        run_tool_agent(
            &self.llm,
            prompts::GITLAB_AGENT_SYSTEM_PROMPT,
            query,
            &channel,
            self.max_tool_iterations,
        )
        .await
    }
}

#[async_trait]
impl Capability for GitLabCapability {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn ask(&self, query: &str) -> String {
        let span = tracing::info_span!("gitlab_ask", session_id = %self.session.session_id);
        contain_errors(NAME, self.run(query).instrument(span).await)
    }
}
