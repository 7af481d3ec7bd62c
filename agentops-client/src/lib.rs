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


//! # AgentOps client for Rust
//!
//! Best-effort tracking of sessions, traces and agent events. Every event is
//! kept in memory on the active session and POSTed to the collector in the
//! background; delivery failures are logged and never reach the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agentops_client::{AgentOps, InitOptions, LlmCall, TraceState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ops = AgentOps::new();
//!     ops.init("my-api-key", InitOptions::default().with_tags(vec!["web".into()]));
//!
//!     let trace_id = ops.start_trace("checkout", Some(vec!["flow".into()]))?;
//!     ops.record_llm(LlmCall::new("gpt-4o", "Hello", "Hi!").with_tokens(12))?;
//!     ops.end_trace(&trace_id, TraceState::Success)?;
//!
//!     ops.end_session(TraceState::Success)?;
//!     ops.flush().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Instrumenting async work
//!
//! ```no_run
//! use agentops_client::{instrument, AgentOps};
//!
//! # async fn search(q: &str) -> Result<String, std::io::Error> { Ok(q.to_string()) }
//! # async fn example(ops: &AgentOps) -> Result<(), std::io::Error> {
//! let results = instrument::tool(ops, "web_search", Some(0.05), serde_json::json!(["rust"]), search("rust")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
mod error;
pub mod instrument;
mod tracker;
pub mod transport;

pub use agentops_core::{
    ActionRecord, ErrorRecord, Event, EventData, EventKind, LlmCall, Session, SessionInfo,
    ToolCall, Trace, TraceState,
};
pub use config::{api_key_from_env, AgentOpsConfig, InitOptions, DEFAULT_ENDPOINT};
pub use dispatcher::{DeliveryObserver, DeliveryOutcome, DeliveryStats, Dispatcher, Submission};
pub use error::{AgentOpsError, Result};
pub use tracker::AgentOps;
pub use transport::{DeliveryRequest, HttpTransport, MemoryTransport, Transport};
