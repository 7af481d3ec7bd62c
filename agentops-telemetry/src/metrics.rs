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


//! OpenTelemetry counters for event delivery.

use agentops_client::{DeliveryObserver, DeliveryOutcome, EventKind};
use opentelemetry::{
    metrics::{Counter, Meter},
    KeyValue,
};

/// Delivery counters, attributed by `event.kind`.
///
/// Plug into the client with [`agentops_client::AgentOps::with_observer`].
#[derive(Clone)]
pub struct DeliveryMetrics {
    pub events_submitted: Counter<u64>,
    pub events_delivered: Counter<u64>,
    pub events_failed: Counter<u64>,
    pub events_suppressed: Counter<u64>,
}

impl DeliveryMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            events_submitted: meter
                .u64_counter("agentops.events.submitted")
                .with_description("Events handed to the dispatcher")
                .init(),
            events_delivered: meter
                .u64_counter("agentops.events.delivered")
                .with_description("Events accepted by the collector")
                .init(),
            events_failed: meter
                .u64_counter("agentops.events.failed")
                .with_description("Events dropped after a failed delivery attempt")
                .init(),
            events_suppressed: meter
                .u64_counter("agentops.events.suppressed")
                .with_description("Events not sent because no API key is configured")
                .init(),
        }
    }

    pub fn record_submitted(&self, kind: EventKind) {
        self.events_submitted.add(1, &attributes(kind));
    }

    pub fn record_outcome(&self, kind: EventKind, outcome: &DeliveryOutcome) {
        let counter = match outcome {
            DeliveryOutcome::Delivered => &self.events_delivered,
            DeliveryOutcome::Failed(_) => &self.events_failed,
            DeliveryOutcome::Suppressed => &self.events_suppressed,
        };
        counter.add(1, &attributes(kind));
    }
}

fn attributes(kind: EventKind) -> [KeyValue; 1] {
    [KeyValue::new("event.kind", kind.as_str())]
}

impl DeliveryObserver for DeliveryMetrics {
    fn on_submit(&self, kind: EventKind) {
        self.record_submitted(kind);
    }

    fn on_outcome(&self, kind: EventKind, outcome: &DeliveryOutcome) {
        self.record_outcome(kind, outcome);
    }
}
