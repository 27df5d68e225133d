//! # S.C.O.U.T - Similar-project Orchestration Server
//!
//! An agentic orchestration server that answers "find similar past
//! projects" questions. One inbound query is classified by a routing LLM
//! call, fanned out concurrently to the relevant search capabilities
//! (GitLab, GitHub, document knowledge base), and the per-capability
//! findings are merged into a single response envelope.
//!
//! ## Overview
//!
//! The crate can be used two ways:
//!
//! 1. **As a standalone server** - Run the `scout-server` binary
//! 2. **As a library** - Wire the orchestrator into your own service
//!
//! ### Library example
//!
//! ```rust,ignore
//! use scout::{CapabilityRegistry, Orchestrator, OpenAIClient, ScoutConfig};
//! use std::sync::Arc;
//!
//! let config = ScoutConfig::load("scout.toml")?;
//! let llm: Arc<dyn scout::LLMClient> = Arc::new(OpenAIClient::from_config(&config.llm)?);
//! let registry = Arc::new(CapabilityRegistry::from_config(&config.capabilities, Arc::clone(&llm)));
//! let orchestrator = Orchestrator::new(llm, registry, &config.orchestrator);
//!
//! let envelope = orchestrator.handle("find React dashboards with auth").await?;
//! println!("{}", envelope.message);
//! ```
//!
//! ## Modules
//!
//! - [`capabilities`] - Capability adapters and their registry
//! - [`orchestrator`] - Planner, concurrent dispatcher, aggregator, session context
//! - [`api`] - HTTP routes and handlers
//! - [`llm`] - LLM client abstraction and the OpenAI-compatible implementation
//! - [`types`] - Wire types, orchestration data model, error taxonomy
//! - [`utils`] - TOML configuration
//!
//! ## Failure model
//!
//! A capability failure is contained to that capability's outcome and never
//! fails the request; partial success is a first-class result. Failures in
//! the routing decision or final synthesis fail the whole request, since no
//! meaningful partial output exists for those stages.

/// HTTP API handlers and routes.
pub mod api;
/// Capability adapters (GitLab, GitHub, documents) and their registry.
pub mod capabilities;
/// Command-line interface for the server binary.
pub mod cli;
/// LLM client abstraction and implementations.
pub mod llm;
/// Orchestration core: planner, dispatcher, aggregator, session context.
pub mod orchestrator;
/// Core types (requests, responses, outcomes, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use capabilities::{Capability, CapabilityRegistry};
pub use llm::{LLMClient, LLMResponse, OpenAIClient};
pub use orchestrator::{Orchestrator, SessionContext};
pub use types::{AppError, ResponseEnvelope, Result, RoutingDecision};
pub use utils::config::ScoutConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ScoutConfig>,
    /// The orchestrator driving every invocation
    pub orchestrator: Arc<Orchestrator>,
}
