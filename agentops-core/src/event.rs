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


//! AgentOps events
//!
//! An [`Event`] is an immutable record of one occurrence: an LLM call, a tool
//! call, an action, an error, or a session/trace lifecycle marker. Its JSON
//! form is the exact body POSTed to the collector:
//!
//! ```json
//! {"id": "...", "type": "llm", "timestamp": 1730800800000,
//!  "data": {"event_type": "llm_call", "model": "gpt-4o", ...},
//!  "sessionId": "..."}
//! ```

use crate::ids::{generate_id, now_millis};
use crate::session::TraceState;
use serde::{Deserialize, Serialize};

/// Event category, serialized as the top-level `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Llm,
    Tool,
    Action,
    Error,
    /// Session and trace lifecycle markers
    Custom,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Llm => "llm",
            EventKind::Tool => "tool",
            EventKind::Action => "action",
            EventKind::Error => "error",
            EventKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of a `session_start` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStart {
    pub session_id: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_name: Option<String>,
}

/// Payload of a `session_end` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEnd {
    pub session_id: String,
    pub end_state: TraceState,
    /// Milliseconds between start and end
    pub duration: i64,
}

/// Payload of a `trace_start` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStart {
    pub trace_id: String,
    pub trace_name: String,
    /// Tags exactly as passed to `start_trace`, absent when none were given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Payload of a `trace_end` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEnd {
    pub trace_id: String,
    pub end_state: TraceState,
    /// Milliseconds between start and end
    pub duration: i64,
}

/// An LLM invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LlmCall {
    pub model: String,
    pub prompt: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
}

impl LlmCall {
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            response: response.into(),
            ..Default::default()
        }
    }

    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency = Some(latency_ms);
        self
    }
}

/// A tool invocation with arbitrary JSON input and output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub input: serde_json::Value,
    pub output: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
}

impl ToolCall {
    pub fn new(
        name: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            cost: None,
            latency: None,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency = Some(latency_ms);
        self
    }
}

/// A user or agent action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: String,
    pub params: serde_json::Value,
    pub result: serde_json::Value,
}

impl ActionRecord {
    pub fn new(
        action: impl Into<String>,
        params: serde_json::Value,
        result: serde_json::Value,
    ) -> Self {
        Self {
            action: action.into(),
            params,
            result,
        }
    }
}

/// A failure reported by the host application. This is data, not an error
/// of the tracking client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// The error's display message
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            stack: None,
            context: None,
        }
    }

    /// Capture an error's message and its `source()` chain.
    ///
    /// Rust errors carry no stack of their own, so the chain of causes is
    /// rendered as the stack text, one `caused by:` line per source.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut stack = String::new();
        let mut source = error.source();
        while let Some(cause) = source {
            if !stack.is_empty() {
                stack.push('\n');
            }
            stack.push_str("caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            error: error.to_string(),
            stack: if stack.is_empty() { None } else { Some(stack) },
            context: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_context(mut self, context: Option<serde_json::Value>) -> Self {
        self.context = context;
        self
    }
}

/// Kind-specific payload, tagged by `event_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventData {
    SessionStart(SessionStart),
    SessionEnd(SessionEnd),
    TraceStart(TraceStart),
    TraceEnd(TraceEnd),
    LlmCall(LlmCall),
    ToolCall(ToolCall),
    Action(ActionRecord),
    Error(ErrorRecord),
}

impl EventData {
    pub fn kind(&self) -> EventKind {
        match self {
            EventData::SessionStart(_)
            | EventData::SessionEnd(_)
            | EventData::TraceStart(_)
            | EventData::TraceEnd(_) => EventKind::Custom,
            EventData::LlmCall(_) => EventKind::Llm,
            EventData::ToolCall(_) => EventKind::Tool,
            EventData::Action(_) => EventKind::Action,
            EventData::Error(_) => EventKind::Error,
        }
    }

    /// The `event_type` tag as it appears on the wire.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventData::SessionStart(_) => "session_start",
            EventData::SessionEnd(_) => "session_end",
            EventData::TraceStart(_) => "trace_start",
            EventData::TraceEnd(_) => "trace_end",
            EventData::LlmCall(_) => "llm_call",
            EventData::ToolCall(_) => "tool_call",
            EventData::Action(_) => "action",
            EventData::Error(_) => "error",
        }
    }
}

/// Immutable event record.
///
/// Fields are only readable once constructed; the owning session or trace
/// gets its own copy and the delivery path serializes another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: String,
    #[serde(rename = "type")]
    kind: EventKind,
    timestamp: i64,
    data: EventData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl Event {
    /// Build a new event stamped with a fresh id and the current time.
    pub fn new(data: EventData, session_id: Option<String>, trace_id: Option<String>) -> Self {
        Self {
            id: generate_id(),
            kind: data.kind(),
            timestamp: now_millis(),
            data,
            tags: None,
            session_id,
            trace_id,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn event_type(&self) -> &'static str {
        self.data.event_type()
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_llm_event_wire_shape() {
        let call = LlmCall::new("gpt-3.5-turbo", "Hello", "Hi there")
            .with_tokens(100)
            .with_cost(0.001);
        let event = Event::new(EventData::LlmCall(call), Some("s1".into()), None);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "llm");
        assert_eq!(value["sessionId"], "s1");
        assert!(value.get("traceId").is_none());
        assert!(value.get("tags").is_none());
        assert_eq!(
            value["data"],
            json!({
                "event_type": "llm_call",
                "model": "gpt-3.5-turbo",
                "prompt": "Hello",
                "response": "Hi there",
                "tokens": 100,
                "cost": 0.001,
            })
        );
    }

    #[test]
    fn test_trace_end_carries_state() {
        let event = Event::new(
            EventData::TraceEnd(TraceEnd {
                trace_id: "t1".into(),
                end_state: TraceState::Fail,
                duration: 12,
            }),
            Some("s1".into()),
            Some("t1".into()),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "custom");
        assert_eq!(value["traceId"], "t1");
        assert_eq!(value["data"]["event_type"], "trace_end");
        assert_eq!(value["data"]["end_state"], "Fail");
        assert_eq!(value["data"]["duration"], 12);
    }

    #[test]
    fn test_trace_start_omits_missing_tags() {
        let data = EventData::TraceStart(TraceStart {
            trace_id: "t1".into(),
            trace_name: "checkout".into(),
            tags: None,
        });
        let value = serde_json::to_value(&data).unwrap();
        assert!(value.get("tags").is_none());
        assert_eq!(value["trace_name"], "checkout");
    }

    #[test]
    fn test_kind_follows_payload() {
        let cases = [
            (EventData::Action(ActionRecord::default()), EventKind::Action),
            (EventData::ToolCall(ToolCall::default()), EventKind::Tool),
            (EventData::Error(ErrorRecord::new("boom")), EventKind::Error),
            (
                EventData::SessionEnd(SessionEnd {
                    session_id: "s".into(),
                    end_state: TraceState::Success,
                    duration: 0,
                }),
                EventKind::Custom,
            ),
        ];
        for (data, kind) in cases {
            assert_eq!(Event::new(data, None, None).kind(), kind);
        }
    }

    #[test]
    fn test_event_parses_back() {
        let raw = json!({
            "id": "abc",
            "type": "tool",
            "timestamp": 1730800800000i64,
            "data": {
                "event_type": "tool_call",
                "name": "web_search",
                "input": ["rust"],
                "output": "results",
                "latency": 500
            },
            "sessionId": "s1"
        });
        let event: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(event.id(), "abc");
        assert_eq!(event.event_type(), "tool_call");
        match event.data() {
            EventData::ToolCall(call) => {
                assert_eq!(call.name, "web_search");
                assert_eq!(call.latency, Some(500));
                assert_eq!(call.cost, None);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[derive(Debug)]
    struct Inner;

    impl std::fmt::Display for Inner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "connection reset")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "search failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_record_captures_source_chain() {
        let record = ErrorRecord::from_error(&Outer(Inner));
        assert_eq!(record.error, "search failed");
        assert_eq!(record.stack.as_deref(), Some("caused by: connection reset"));

        let leaf = ErrorRecord::from_error(&Inner);
        assert_eq!(leaf.error, "connection reset");
        assert!(leaf.stack.is_none());
    }
}
