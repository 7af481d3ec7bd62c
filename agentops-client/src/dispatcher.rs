// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Fire-and-forget event dispatch
//!
//! Each submitted event is delivered on its own Tokio task so the caller
//! never waits on the network. The outcome is:
//! - logged (`warn!` on failure),
//! - counted in [`DeliveryStats`],
//! - reported to an optional [`DeliveryObserver`],
//! - and available through the returned [`Submission`] for callers that
//!   choose to await it.
//!
//! Nothing is retried or queued. A slow delivery never blocks another one,
//! so events may reach the collector out of order.

use crate::config::AgentOpsConfig;
use crate::error::AgentOpsError;
use crate::transport::{DeliveryRequest, Transport};
use agentops_core::{Event, EventKind};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How a single delivery attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Collector accepted the event
    Delivered,
    /// No API key configured; nothing was sent
    Suppressed,
    /// Transport error, non-success response, or no runtime to send on
    Failed(String),
}

/// Receives delivery outcomes, e.g. to export drop-rate metrics.
///
/// Called from the delivery task, or synchronously from the submitting
/// thread when the event is settled without a network call.
pub trait DeliveryObserver: Send + Sync {
    /// Called once per event, before any delivery attempt.
    fn on_submit(&self, _kind: EventKind) {}

    fn on_outcome(&self, kind: EventKind, outcome: &DeliveryOutcome);
}

/// Snapshot of delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryStats {
    pub submitted: u64,
    pub delivered: u64,
    pub failed: u64,
    pub suppressed: u64,
}

impl DeliveryStats {
    /// Events submitted but not yet settled.
    pub fn pending(&self) -> u64 {
        self.submitted
            .saturating_sub(self.delivered + self.failed + self.suppressed)
    }
}

/// Handle on one submitted event.
///
/// Dropping it detaches the delivery; the event is still sent.
#[derive(Debug)]
pub enum Submission {
    InFlight(JoinHandle<DeliveryOutcome>),
    Settled(DeliveryOutcome),
}

impl Submission {
    pub fn is_settled(&self) -> bool {
        matches!(self, Submission::Settled(_))
    }

    /// Wait for the delivery attempt to finish.
    pub async fn outcome(self) -> DeliveryOutcome {
        match self {
            Submission::InFlight(handle) => handle
                .await
                .unwrap_or_else(|e| DeliveryOutcome::Failed(format!("delivery task failed: {}", e))),
            Submission::Settled(outcome) => outcome,
        }
    }
}

#[derive(Default)]
struct DispatchState {
    submitted: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    suppressed: AtomicU64,
    in_flight: AtomicUsize,
    idle: Notify,
}

impl DispatchState {
    fn settle(&self, kind: EventKind, outcome: &DeliveryOutcome, observer: Option<&dyn DeliveryObserver>) {
        let counter = match outcome {
            DeliveryOutcome::Delivered => &self.delivered,
            DeliveryOutcome::Suppressed => &self.suppressed,
            DeliveryOutcome::Failed(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if let Some(observer) = observer {
            observer.on_outcome(kind, outcome);
        }
    }
}

/// Decrements the in-flight count even if the delivery task panics.
struct InFlightGuard(Arc<DispatchState>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Spawns one delivery task per event.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    observer: Option<Arc<dyn DeliveryObserver>>,
    state: Arc<DispatchState>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            observer: None,
            state: Arc::new(DispatchState::default()),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn DeliveryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Submit an event for delivery without waiting for it.
    ///
    /// Never fails: a missing API key or a missing Tokio runtime settles the
    /// submission immediately with a logged warning.
    pub fn submit(&self, config: &AgentOpsConfig, event: Event) -> Submission {
        self.state.submitted.fetch_add(1, Ordering::Relaxed);
        let kind = event.kind();
        if let Some(observer) = &self.observer {
            observer.on_submit(kind);
        }

        if !config.has_api_key() {
            warn!(
                event_type = event.event_type(),
                "AgentOps: API key not configured, event not sent"
            );
            return self.settle_now(kind, DeliveryOutcome::Suppressed);
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!(
                    event_type = event.event_type(),
                    "AgentOps: {}, event dropped",
                    AgentOpsError::NoRuntime
                );
                return self.settle_now(
                    kind,
                    DeliveryOutcome::Failed(AgentOpsError::NoRuntime.to_string()),
                );
            }
        };

        let request = DeliveryRequest {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            event,
        };
        let transport = Arc::clone(&self.transport);
        let observer = self.observer.clone();
        let state = Arc::clone(&self.state);

        state.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlightGuard(Arc::clone(&state));

        let handle = runtime.spawn(async move {
            let _guard = guard;
            let event_type = request.event.event_type();
            let outcome = match transport.send(&request).await {
                Ok(()) => {
                    debug!(event_id = request.event.id(), event_type, "AgentOps: event delivered");
                    DeliveryOutcome::Delivered
                }
                Err(e) => {
                    warn!(event_id = request.event.id(), event_type, "AgentOps: Failed to send event: {}", e);
                    DeliveryOutcome::Failed(e.to_string())
                }
            };
            state.settle(kind, &outcome, observer.as_deref());
            outcome
        });

        Submission::InFlight(handle)
    }

    fn settle_now(&self, kind: EventKind, outcome: DeliveryOutcome) -> Submission {
        self.state.settle(kind, &outcome, self.observer.as_deref());
        Submission::Settled(outcome)
    }

    pub fn stats(&self) -> DeliveryStats {
        DeliveryStats {
            submitted: self.state.submitted.load(Ordering::Relaxed),
            delivered: self.state.delivered.load(Ordering::Relaxed),
            failed: self.state.failed.load(Ordering::Relaxed),
            suppressed: self.state.suppressed.load(Ordering::Relaxed),
        }
    }

    /// Number of deliveries still running.
    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::Acquire)
    }

    /// Wait until every delivery spawned so far has finished.
    ///
    /// This only waits; it never resends anything.
    pub async fn flush(&self) {
        loop {
            let idle = self.state.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            idle.await;
        }
    }
}
