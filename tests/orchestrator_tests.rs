//! Property-style tests for the dispatch/aggregation pipeline:
//! failure containment (one bad capability never aborts the rest) and
//! ordering determinism (outcomes follow selection order, not completion
//! order).

use async_trait::async_trait;
use scout::{
    Capability, CapabilityRegistry, LLMClient, LLMResponse,
    orchestrator::{Aggregator, Dispatcher},
    types::{CallStatus, Result, ToolDefinition},
};
use std::sync::Arc;
use std::time::Duration;

/// Capability stub whose behavior is chosen per instance.
enum Behavior {
    Answer(&'static str, Duration),
    Fail(&'static str),
    Hang,
}

struct Scripted {
    name: &'static str,
    behavior: Behavior,
}

#[async_trait]
impl Capability for Scripted {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "scripted capability"
    }
    async fn ask(&self, _query: &str) -> String {
        match &self.behavior {
            Behavior::Answer(text, delay) => {
                tokio::time::sleep(*delay).await;
                text.to_string()
            }
            Behavior::Fail(reason) => {
                format!("Error in {} assistant: {}", self.name, reason)
            }
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("hanging capability should be timed out")
            }
        }
    }
}

struct EchoLLM;

#[async_trait]
impl LLMClient for EchoLLM {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
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
        "echo"
    }
}

fn registry(caps: Vec<Scripted>) -> Arc<CapabilityRegistry> {
    let mut registry = CapabilityRegistry::new();
    for cap in caps {
        registry.register(Arc::new(cap));
    }
    Arc::new(registry)
}

#[tokio::test]
async fn test_containment_failures_never_abort_the_rest() {
    // One success, one contained failure, one hang past its budget:
    // dispatch must return exactly three outcomes and aggregation must
    // still produce an envelope.
    let registry = registry(vec![
        Scripted {
            name: "gitlab",
            behavior: Behavior::Answer("found project-alpha", Duration::from_millis(10)),
        },
        Scripted {
            name: "github",
            behavior: Behavior::Fail("connection reset"),
        },
        Scripted {
            name: "documents",
            behavior: Behavior::Hang,
        },
    ]);

    let dispatcher = Dispatcher::new(
        Arc::clone(&registry),
        Duration::from_millis(100),
        Duration::from_secs(5),
    );

    let selected: Vec<String> = ["gitlab", "github", "documents"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let outcomes = dispatcher.dispatch(&selected, "query").await.unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].status, CallStatus::Success);
    assert_eq!(outcomes[1].status, CallStatus::Failure);
    assert_eq!(outcomes[2].status, CallStatus::Timeout);

    let aggregator = Aggregator::new(Arc::new(EchoLLM), "scout-orchestrator".to_string());
    let envelope = aggregator.aggregate("query", &outcomes, None).await.unwrap();
    assert!(!envelope.message.is_empty());
    assert!(envelope.message.contains("found project-alpha"));
    assert!(envelope.message.contains("connection reset"));
}

#[tokio::test]
async fn test_ordering_matches_selection_for_every_completion_order() {
    // Latencies arranged so completion order inverts, interleaves, and
    // matches the selection order across the three runs.
    let latency_grids: &[[u64; 3]] = &[[60, 30, 5], [5, 60, 30], [30, 5, 60]];

    for grid in latency_grids {
        let registry = registry(vec![
            Scripted {
                name: "gitlab",
                behavior: Behavior::Answer("a", Duration::from_millis(grid[0])),
            },
            Scripted {
                name: "github",
                behavior: Behavior::Answer("b", Duration::from_millis(grid[1])),
            },
            Scripted {
                name: "documents",
                behavior: Behavior::Answer("c", Duration::from_millis(grid[2])),
            },
        ]);

        let dispatcher = Dispatcher::new(
            registry,
            Duration::from_secs(5),
            Duration::from_secs(10),
        );

        let selected: Vec<String> = ["documents", "gitlab", "github"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let outcomes = dispatcher.dispatch(&selected, "query").await.unwrap();

        let order: Vec<&str> = outcomes.iter().map(|o| o.capability.as_str()).collect();
        assert_eq!(order, vec!["documents", "gitlab", "github"]);
        assert!(outcomes.iter().all(|o| o.status == CallStatus::Success));
    }
}

#[tokio::test]
async fn test_single_capability_selection() {
    let registry = registry(vec![Scripted {
        name: "documents",
        behavior: Behavior::Answer("one doc", Duration::ZERO),
    }]);

    let dispatcher = Dispatcher::new(
        registry,
        Duration::from_secs(5),
        Duration::from_secs(10),
    );

    let outcomes = dispatcher
        .dispatch(&["documents".to_string()], "query")
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].payload, "one doc");
}
