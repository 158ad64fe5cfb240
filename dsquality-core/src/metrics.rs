//! Request counters for callers that expose evaluation metrics.
//!
//! The quality engine never records anything itself. A caller that wants
//! counters wraps its engine calls, builds an [`EvaluationEvent`] and hands it
//! to an [`EvaluationObserver`] such as [`RequestStats`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a single evaluation call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    Ok { ok_for_model: bool },
    Error,
}

/// One evaluation call, as reported by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationEvent {
    /// Name of the operation, e.g. `summary` or `inspect`
    pub endpoint: String,
    /// Wall-clock time spent in the call
    pub latency: Duration,
    /// Verdict, or the fact that the call failed
    pub outcome: EvaluationOutcome,
}

impl EvaluationEvent {
    /// Creates an event for a finished call.
    pub fn new(endpoint: impl Into<String>, latency: Duration, outcome: EvaluationOutcome) -> Self {
        Self {
            endpoint: endpoint.into(),
            latency,
            outcome,
        }
    }
}

/// Receives an event after each evaluation call.
pub trait EvaluationObserver: Send + Sync {
    fn record(&self, event: &EvaluationEvent);
}

/// Point-in-time view of the accumulated counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    /// Mean latency over all recorded calls, in milliseconds
    pub avg_latency_ms: f64,
    /// Calls per endpoint, ordered by endpoint name
    pub endpoint_calls: BTreeMap<String, u64>,
    /// Verdict of the most recent successful call
    pub last_ok_for_model: Option<bool>,
    pub errors: u64,
}

#[derive(Debug, Default)]
struct Counters {
    total_requests: u64,
    total_latency: Duration,
    endpoint_calls: BTreeMap<String, u64>,
    last_ok_for_model: Option<bool>,
    errors: u64,
}

/// In-memory [`EvaluationObserver`] safe to share between threads.
#[derive(Debug, Default)]
pub struct RequestStats {
    counters: Mutex<Counters>,
}

impl RequestStats {
    /// Creates an empty set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self.lock();
        let avg_latency_ms = if counters.total_requests == 0 {
            0.0
        } else {
            counters.total_latency.as_secs_f64() * 1000.0 / counters.total_requests as f64
        };

        MetricsSnapshot {
            total_requests: counters.total_requests,
            avg_latency_ms,
            endpoint_calls: counters.endpoint_calls.clone(),
            last_ok_for_model: counters.last_ok_for_model,
            errors: counters.errors,
        }
    }

    // Counters stay consistent even if a recording thread panicked.
    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EvaluationObserver for RequestStats {
    fn record(&self, event: &EvaluationEvent) {
        let mut counters = self.lock();
        counters.total_requests += 1;
        counters.total_latency += event.latency;
        *counters
            .endpoint_calls
            .entry(event.endpoint.clone())
            .or_insert(0) += 1;

        match event.outcome {
            EvaluationOutcome::Ok { ok_for_model } => {
                counters.last_ok_for_model = Some(ok_for_model);
            }
            EvaluationOutcome::Error => counters.errors += 1,
        }

        tracing::trace!(endpoint = %event.endpoint, "Recorded evaluation event");
    }
}
