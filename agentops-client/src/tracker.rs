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


//! The AgentOps tracking client
//!
//! [`AgentOps`] holds at most one active [`Session`] and any number of active
//! [`Trace`]s. All mutation happens under a single lock, so each session's
//! event log keeps call order even when the client is shared between tasks.
//! Delivery is handed to the [`Dispatcher`] after the lock is released.

use crate::config::{AgentOpsConfig, InitOptions};
use crate::dispatcher::{DeliveryObserver, DeliveryStats, Dispatcher};
use crate::error::{AgentOpsError, Result};
use crate::transport::{HttpTransport, Transport};
use agentops_core::{
    ActionRecord, ErrorRecord, Event, EventData, LlmCall, Session, SessionEnd, SessionInfo,
    SessionStart, ToolCall, Trace, TraceEnd, TraceStart, TraceState,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

#[derive(Default)]
struct TrackerState {
    active_session: Option<Session>,
    active_traces: HashMap<String, Trace>,
}

/// AgentOps tracking client.
///
/// Inert until [`AgentOps::init`]: every mutating operation returns
/// [`AgentOpsError::NotInitialized`] before that, while the read accessors
/// return empty results.
///
/// # Example
///
/// ```no_run
/// use agentops_client::{AgentOps, InitOptions, TraceState};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let ops = AgentOps::new();
///     ops.init("key1", InitOptions::default());
///
///     let trace_id = ops.start_trace("checkout", Some(vec!["flow".into()]))?;
///     ops.end_trace(&trace_id, TraceState::Fail)?;
///     assert!(ops.active_traces().is_empty());
///     Ok(())
/// }
/// ```
pub struct AgentOps {
    config: OnceLock<AgentOpsConfig>,
    state: Mutex<TrackerState>,
    dispatcher: Dispatcher,
}

impl AgentOps {
    /// Client that delivers over HTTP.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    /// Client that delivers through the given transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: OnceLock::new(),
            state: Mutex::new(TrackerState::default()),
            dispatcher: Dispatcher::new(transport),
        }
    }

    /// Report every delivery outcome to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn DeliveryObserver>) -> Self {
        self.dispatcher = self.dispatcher.with_observer(observer);
        self
    }

    /// Initialize the client.
    ///
    /// Idempotent: only the first call takes effect. Later calls keep the
    /// first configuration and do not start another session. Returns
    /// whether this call performed the initialization.
    pub fn init(&self, api_key: impl Into<String>, options: InitOptions) -> bool {
        let mut state = self.state.lock();
        if self.config.set(AgentOpsConfig::new(api_key, options)).is_err() {
            debug!("AgentOps already initialized, ignoring init");
            return false;
        }
        let Some(config) = self.config.get() else {
            return false;
        };

        info!(
            endpoint = %config.endpoint,
            delivery = config.has_api_key(),
            "AgentOps initialized"
        );

        let session_event = if config.auto_start_session {
            let (_, event) = open_session(&mut state, config, None, None);
            Some(event)
        } else {
            None
        };
        drop(state);

        if let Some(event) = session_event {
            self.dispatch(config, event);
        }
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.config.get().is_some()
    }

    /// Configuration fixed by `init`, if any.
    pub fn config(&self) -> Option<&AgentOpsConfig> {
        self.config.get()
    }

    fn initialized_config(&self) -> Result<&AgentOpsConfig> {
        self.config.get().ok_or(AgentOpsError::NotInitialized)
    }

    fn dispatch(&self, config: &AgentOpsConfig, event: Event) {
        // Outcome is observed through stats/observer, not by the caller.
        let _ = self.dispatcher.submit(config, event);
    }

    /// Start a new session, replacing any active one without ending it.
    pub fn start_session(
        &self,
        tags: Option<Vec<String>>,
        trace_name: Option<String>,
    ) -> Result<String> {
        let config = self.initialized_config()?;
        let (session_id, event) = {
            let mut state = self.state.lock();
            open_session(&mut state, config, tags, trace_name)
        };
        self.dispatch(config, event);
        Ok(session_id)
    }

    /// End the active session. No-op when there is none.
    pub fn end_session(&self, end_state: TraceState) -> Result<()> {
        let config = self.initialized_config()?;
        let event = {
            let mut state = self.state.lock();
            let Some(mut session) = state.active_session.take() else {
                debug!("end_session without an active session");
                return Ok(());
            };

            let duration = session.finish(end_state);
            let event = Event::new(
                EventData::SessionEnd(SessionEnd {
                    session_id: session.id.clone(),
                    end_state,
                    duration,
                }),
                Some(session.id.clone()),
                None,
            );
            session.record(event.clone());
            debug!(session_id = %session.id, %end_state, duration, "session ended");
            event
        };
        self.dispatch(config, event);
        Ok(())
    }

    /// Start a trace, starting a default session first if none is active.
    pub fn start_trace(&self, name: &str, tags: Option<Vec<String>>) -> Result<String> {
        let config = self.initialized_config()?;
        let (trace_id, session_event, trace_event) = {
            let mut state = self.state.lock();

            let existing = state.active_session.as_ref().map(|s| s.id.clone());
            let (session_id, session_event) = match existing {
                Some(session_id) => (session_id, None),
                None => {
                    let (session_id, event) = open_session(&mut state, config, None, None);
                    (session_id, Some(event))
                }
            };

            let mut trace = Trace::new(name, tags.clone().unwrap_or_default(), session_id.clone());
            let event = Event::new(
                EventData::TraceStart(TraceStart {
                    trace_id: trace.id.clone(),
                    trace_name: trace.name.clone(),
                    tags,
                }),
                Some(session_id),
                Some(trace.id.clone()),
            );
            trace.record(event.clone());

            let trace_id = trace.id.clone();
            debug!(trace_id = %trace_id, trace_name = name, "trace started");
            state.active_traces.insert(trace_id.clone(), trace);
            (trace_id, session_event, event)
        };

        if let Some(event) = session_event {
            self.dispatch(config, event);
        }
        self.dispatch(config, trace_event);
        Ok(trace_id)
    }

    /// End an active trace. Unknown or already-ended ids are a no-op.
    pub fn end_trace(&self, trace_id: &str, end_state: TraceState) -> Result<()> {
        let config = self.initialized_config()?;
        let event = {
            let mut state = self.state.lock();
            let Some(mut trace) = state.active_traces.remove(trace_id) else {
                debug!(trace_id, "end_trace for unknown or ended trace");
                return Ok(());
            };

            let duration = trace.finish(end_state);
            let event = Event::new(
                EventData::TraceEnd(TraceEnd {
                    trace_id: trace.id.clone(),
                    end_state,
                    duration,
                }),
                Some(trace.session_id.clone()),
                Some(trace.id.clone()),
            );
            trace.record(event.clone());
            debug!(trace_id, %end_state, duration, "trace ended");
            event
        };
        self.dispatch(config, event);
        Ok(())
    }

    /// Record an LLM call on the active session.
    pub fn record_llm(&self, call: LlmCall) -> Result<()> {
        self.record(EventData::LlmCall(call))
    }

    /// Record a tool call on the active session.
    pub fn record_tool(&self, call: ToolCall) -> Result<()> {
        self.record(EventData::ToolCall(call))
    }

    /// Record an action on the active session.
    pub fn record_action(&self, action: ActionRecord) -> Result<()> {
        self.record(EventData::Action(action))
    }

    /// Record a host-application error with optional context.
    ///
    /// Captures the message and the `source()` chain. Only fails when the
    /// client is not initialized.
    pub fn record_error(
        &self,
        error: &(dyn std::error::Error + 'static),
        context: Option<serde_json::Value>,
    ) -> Result<()> {
        self.record_error_record(ErrorRecord::from_error(error).with_context(context))
    }

    /// Record an already-captured error.
    pub fn record_error_record(&self, record: ErrorRecord) -> Result<()> {
        self.record(EventData::Error(record))
    }

    /// Events target the active session only, never a trace. With no
    /// active session the event is still submitted, without a session id.
    fn record(&self, data: EventData) -> Result<()> {
        let config = self.initialized_config()?;
        let event = {
            let mut state = self.state.lock();
            let session_id = state.active_session.as_ref().map(|s| s.id.clone());
            let event = Event::new(data, session_id, None);
            if let Some(session) = state.active_session.as_mut() {
                session.record(event.clone());
            }
            event
        };
        self.dispatch(config, event);
        Ok(())
    }

    /// Snapshot of the active session.
    pub fn active_session(&self) -> Option<Session> {
        self.state.lock().active_session.clone()
    }

    /// Snapshot of the active traces, in no particular order.
    pub fn active_traces(&self) -> Vec<Trace> {
        self.state.lock().active_traces.values().cloned().collect()
    }

    /// Counts for display: session id/start, active traces, session events.
    pub fn session_info(&self) -> SessionInfo {
        let state = self.state.lock();
        SessionInfo {
            session_id: state.active_session.as_ref().map(|s| s.id.clone()),
            session_start_time: state.active_session.as_ref().map(|s| s.start_time),
            active_traces: state.active_traces.len(),
            total_events: state
                .active_session
                .as_ref()
                .map_or(0, |s| s.events().len()),
        }
    }

    pub fn delivery_stats(&self) -> DeliveryStats {
        self.dispatcher.stats()
    }

    /// Wait for in-flight deliveries to finish. Nothing is resent.
    pub async fn flush(&self) {
        self.dispatcher.flush().await;
    }
}

impl Default for AgentOps {
    fn default() -> Self {
        Self::new()
    }
}

/// Create and install a session, returning its id and `session_start` event.
fn open_session(
    state: &mut TrackerState,
    config: &AgentOpsConfig,
    tags: Option<Vec<String>>,
    trace_name: Option<String>,
) -> (String, Event) {
    let tags = tags.or_else(|| config.tags.clone()).unwrap_or_default();
    let trace_name = trace_name.or_else(|| config.trace_name.clone());
    let mut session = Session::new(tags, trace_name);

    let event = Event::new(
        EventData::SessionStart(SessionStart {
            session_id: session.id.clone(),
            tags: session.tags.clone(),
            trace_name: session.trace_name.clone(),
        }),
        Some(session.id.clone()),
        None,
    );
    session.record(event.clone());

    if let Some(previous) = state.active_session.as_ref() {
        debug!(previous = %previous.id, "replacing active session without ending it");
    }
    let session_id = session.id.clone();
    debug!(session_id = %session_id, "session started");
    state.active_session = Some(session);
    (session_id, event)
}
