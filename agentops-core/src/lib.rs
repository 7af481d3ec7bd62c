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


//! AgentOps Core
//!
//! Data model for the AgentOps tracking client: sessions, traces and the
//! immutable events recorded against them.
//!
//! Nothing in this crate performs I/O. The tracking client in
//! `agentops-client` owns the mutable state and decides where events go.

pub mod event;
pub mod ids;
pub mod session;

pub use event::{
    ActionRecord, ErrorRecord, Event, EventData, EventKind, LlmCall, SessionEnd, SessionStart,
    ToolCall, TraceEnd, TraceStart,
};
pub use ids::{generate_id, now_millis};
pub use session::{ParseTraceStateError, Session, SessionInfo, Trace, TraceState};
