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


//! Sessions and traces.
//!
//! A [`Session`] bounds one continuous run of the host application. A
//! [`Trace`] is a named unit of work inside a session; it holds the session id
//! as a back-reference but is owned by the tracking client's active-trace
//! map, not by the session.

use crate::event::Event;
use crate::ids::{generate_id, now_millis};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Outcome assigned when a session or trace ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TraceState {
    #[default]
    Success,
    Fail,
    Indeterminate,
}

impl TraceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceState::Success => "Success",
            TraceState::Fail => "Fail",
            TraceState::Indeterminate => "Indeterminate",
        }
    }
}

impl std::fmt::Display for TraceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown trace state: {0} (expected Success, Fail or Indeterminate)")]
pub struct ParseTraceStateError(pub String);

impl FromStr for TraceState {
    type Err = ParseTraceStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "success" => Ok(TraceState::Success),
            "fail" | "failure" => Ok(TraceState::Fail),
            "indeterminate" => Ok(TraceState::Indeterminate),
            _ => Err(ParseTraceStateError(s.to_string())),
        }
    }
}

/// One user visit / application run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub start_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_name: Option<String>,
    events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<TraceState>,
}

impl Session {
    pub fn new(tags: Vec<String>, trace_name: Option<String>) -> Self {
        Self {
            id: generate_id(),
            start_time: now_millis(),
            end_time: None,
            tags,
            trace_name,
            events: Vec::new(),
            state: None,
        }
    }

    /// Events in the order they were recorded.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Append an event. The sequence is append-only.
    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Stamp the end time and terminal state, returning the elapsed
    /// milliseconds.
    pub fn finish(&mut self, state: TraceState) -> i64 {
        let end_time = now_millis();
        self.end_time = Some(end_time);
        self.state = Some(state);
        end_time - self.start_time
    }
}

/// A named, boundable unit of work nested within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub id: String,
    pub name: String,
    pub start_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    pub tags: Vec<String>,
    events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<TraceState>,
    pub session_id: String,
}

impl Trace {
    pub fn new(name: impl Into<String>, tags: Vec<String>, session_id: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            start_time: now_millis(),
            end_time: None,
            tags,
            events: Vec::new(),
            state: None,
            session_id: session_id.into(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn finish(&mut self, state: TraceState) -> i64 {
        let end_time = now_millis();
        self.end_time = Some(end_time);
        self.state = Some(state);
        end_time - self.start_time
    }
}

/// Display read-out of the tracking client's current state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: Option<String>,
    pub session_start_time: Option<i64>,
    pub active_traces: usize,
    pub total_events: usize,
}
