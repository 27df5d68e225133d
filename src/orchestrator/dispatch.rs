//! Concurrent dispatcher
//!
//! Scatter/gather over the selected capabilities. Each call runs as its own
//! task with a per-call timeout; the whole fan-out is bounded by an overall
//! deadline. Exactly one [`CallOutcome`] is produced per selected
//! capability, and outcomes come back in selection order regardless of
//! completion order.

use crate::capabilities::{Capability, CapabilityRegistry, error_marker};
use crate::types::{AppError, CallOutcome, CallStatus, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
    per_call_timeout: Duration,
    overall_deadline: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        per_call_timeout: Duration,
        overall_deadline: Duration,
    ) -> Self {
        Self {
            registry,
            per_call_timeout,
            overall_deadline,
        }
    }

    /// Invoke the selected capabilities in parallel.
    ///
    /// Fails fast with a routing error if any name is unregistered;
    /// afterwards, no individual failure or timeout can fail the dispatch.
    pub async fn dispatch(&self, selected: &[String], query: &str) -> Result<Vec<CallOutcome>> {
        // Resolve everything up front so an unknown name surfaces as a
        // routing fault before any call is made.
        let mut adapters: Vec<Arc<dyn Capability>> = Vec::with_capacity(selected.len());
        for name in selected {
            let adapter = self.registry.resolve(name).map_err(|e| {
                AppError::Routing(format!(
                    "Dispatch requested unresolvable capability '{}': {}",
                    name, e
                ))
            })?;
            adapters.push(adapter);
        }

        let started = Instant::now();
        let deadline = started + self.overall_deadline;
        let per_call = self.per_call_timeout;

        let mut set: JoinSet<(usize, CallOutcome)> = JoinSet::new();
        for (index, adapter) in adapters.into_iter().enumerate() {
            let name = selected[index].clone();
            let query = query.to_string();
            set.spawn(async move {
                let call_started = Instant::now();
                let outcome = match tokio::time::timeout(per_call, adapter.ask(&query)).await {
                    Ok(payload) => classify(name, payload, call_started.elapsed()),
                    Err(_) => CallOutcome {
                        capability: name.clone(),
                        status: CallStatus::Timeout,
                        payload: format!("{} timed out after {:?}", name, per_call),
                        error: Some(format!("call exceeded {:?}", per_call)),
                        latency: call_started.elapsed(),
                    },
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<CallOutcome>> = vec![None; selected.len()];
        let mut deadline_hit = false;

        while !set.is_empty() {
            match tokio::time::timeout_at(deadline, set.join_next()).await {
                Ok(Some(Ok((index, outcome)))) => slots[index] = Some(outcome),
                Ok(Some(Err(join_error))) => {
                    // A panicked branch loses its index; the slot is filled
                    // below as a failure.
                    tracing::error!(error = %join_error, "capability task aborted");
                }
                Ok(None) => break,
                Err(_) => {
                    deadline_hit = true;
                    set.abort_all();
                    break;
                }
            }
        }

        let elapsed = started.elapsed();
        let outcomes = selected
            .iter()
            .zip(slots)
            .map(|(name, slot)| {
                slot.unwrap_or_else(|| {
                    if deadline_hit {
                        CallOutcome {
                            capability: name.clone(),
                            status: CallStatus::Timeout,
                            payload: format!(
                                "{} abandoned at the overall dispatch deadline",
                                name
                            ),
                            error: Some(format!(
                                "dispatch deadline of {:?} expired",
                                self.overall_deadline
                            )),
                            latency: elapsed,
                        }
                    } else {
                        CallOutcome {
                            capability: name.clone(),
                            status: CallStatus::Failure,
                            payload: format!("{} task failed before producing a result", name),
                            error: Some("capability task aborted".to_string()),
                            latency: elapsed,
                        }
                    }
                })
            })
            .collect();

        Ok(outcomes)
    }
}

/// Classify an adapter payload: the error sentinel marks a contained
/// adapter failure, anything else is a success.
fn classify(capability: String, payload: String, latency: Duration) -> CallOutcome {
    let marker = error_marker(&capability);
    if payload.starts_with(&marker) {
        CallOutcome {
            error: Some(payload.clone()),
            capability,
            status: CallStatus::Failure,
            payload,
            latency,
        }
    } else {
        CallOutcome {
            capability,
            status: CallStatus::Success,
            payload,
            error: None,
            latency,
        }
    }
}
