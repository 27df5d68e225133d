//! Orchestration core
//!
//! One inbound query drives one orchestration run: the planner classifies
//! the query against the registry's capability descriptions, the dispatcher
//! fans out to the selected capabilities in parallel, and the aggregator
//! folds the outcomes into the response envelope. Planner and aggregator
//! failures fail the request (no partial output exists at those stages);
//! capability failures never do.

pub mod aggregate;
pub mod dispatch;
pub mod planner;
pub mod session;

pub use aggregate::Aggregator;
pub use dispatch::Dispatcher;
pub use planner::Planner;
pub use session::SessionContext;

use crate::capabilities::CapabilityRegistry;
use crate::llm::LLMClient;
use crate::types::{AppError, ResponseEnvelope, Result};
use crate::utils::config::OrchestratorConfig;
use std::sync::Arc;
use std::time::Duration;

pub struct Orchestrator {
    registry: Arc<CapabilityRegistry>,
    planner: Planner,
    dispatcher: Dispatcher,
    aggregator: Aggregator,
    decide_timeout: Duration,
    synthesize_timeout: Duration,
    session: SessionContext,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        registry: Arc<CapabilityRegistry>,
        config: &OrchestratorConfig,
    ) -> Self {
        let dispatcher = Dispatcher::new(
            Arc::clone(&registry),
            Duration::from_secs(config.per_call_timeout_secs),
            Duration::from_secs(config.overall_deadline_secs),
        );

        Self {
            registry,
            planner: Planner::new(Arc::clone(&llm)),
            dispatcher,
            aggregator: Aggregator::new(llm, config.model_label.clone()),
            decide_timeout: Duration::from_secs(config.decide_timeout_secs),
            synthesize_timeout: Duration::from_secs(config.synthesize_timeout_secs),
            session: SessionContext::new("orchestrator"),
        }
    }

    /// Handle one user query end to end.
    pub async fn handle(&self, query: &str) -> Result<ResponseEnvelope> {
        tracing::info!(
            session_id = %self.session.session_id,
            "orchestration run started"
        );

        let decision = tokio::time::timeout(
            self.decide_timeout,
            self.planner.decide(query, &self.registry.list()),
        )
        .await
        .map_err(|_| {
            AppError::Timeout("routing decision did not complete in time".to_string())
        })??;

        tracing::info!(
            selected = ?decision.selected_capabilities,
            direct_answer = decision.direct_answer.is_some(),
            "routing decision made"
        );

        let outcomes = if decision.selected_capabilities.is_empty() {
            Vec::new()
        } else {
            self.dispatcher
                .dispatch(&decision.selected_capabilities, query)
                .await?
        };

        for outcome in &outcomes {
            tracing::debug!(
                capability = %outcome.capability,
                status = ?outcome.status,
                latency_ms = outcome.latency.as_millis() as u64,
                "capability outcome"
            );
        }

        tokio::time::timeout(
            self.synthesize_timeout,
            self.aggregator
                .aggregate(query, &outcomes, decision.direct_answer.as_deref()),
        )
        .await
        .map_err(|_| {
            AppError::Timeout("result synthesis did not complete in time".to_string())
        })?
    }

    /// The session context correlating this orchestrator's traces.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}
