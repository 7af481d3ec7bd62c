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


//! Instrumentation wrappers for async work
//!
//! Each wrapper takes the work as a future, runs it, and records what
//! happened on the client. The work's own result is always handed back
//! unchanged, whether or not tracking succeeded.
//!
//! ```no_run
//! use agentops_client::{instrument, AgentOps, InitOptions};
//!
//! async fn generate_response(prompt: &str) -> Result<String, std::io::Error> {
//!     Ok(format!("echo: {prompt}"))
//! }
//!
//! # async fn run() -> Result<(), std::io::Error> {
//! let ops = AgentOps::new();
//! ops.init("my-api-key", InitOptions::default());
//!
//! // Trace named after the future's defining function.
//! let reply = instrument::operation(&ops, None, generate_response("hi")).await?;
//! # Ok(())
//! # }
//! ```

use crate::tracker::AgentOps;
use agentops_core::{ActionRecord, ToolCall, TraceState};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::error::Error;
use std::future::Future;
use std::time::Instant;
use tracing::debug;

/// Run `work` inside a trace tagged `operation`.
///
/// Without a name, the trace is named after the future's type path, e.g.
/// `demo.generate_response` for an `async fn generate_response` in module
/// `demo`. On `Err` the error is recorded with `{operation: name}` as
/// context and the trace ends as `Fail`.
pub async fn operation<T, E, Fut>(ops: &AgentOps, name: Option<&str>, work: Fut) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    let name = match name {
        Some(name) => name.to_string(),
        None => derive_operation_name(std::any::type_name::<Fut>()),
    };
    traced(
        ops,
        &name,
        Some(vec!["operation".to_string()]),
        "operation",
        work,
    )
    .await
}

/// Run `work` inside a trace with an explicit name and tags.
///
/// On `Err` the error is recorded with `{trace: name}` as context and the
/// trace ends as `Fail`.
pub async fn trace<T, E, Fut>(
    ops: &AgentOps,
    name: &str,
    tags: Option<Vec<String>>,
    work: Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    traced(ops, name, tags, "trace", work).await
}

async fn traced<T, E, Fut>(
    ops: &AgentOps,
    name: &str,
    tags: Option<Vec<String>>,
    context_key: &str,
    work: Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    let trace_id = match ops.start_trace(name, tags) {
        Ok(trace_id) => trace_id,
        Err(e) => {
            debug!(trace_name = name, "running untracked: {}", e);
            return work.await;
        }
    };

    let result = work.await;
    let end_state = match &result {
        Ok(_) => TraceState::Success,
        Err(e) => {
            let mut context = Map::new();
            context.insert(context_key.to_string(), Value::String(name.to_string()));
            let _ = ops.record_error(e, Some(Value::Object(context)));
            TraceState::Fail
        }
    };
    let _ = ops.end_trace(&trace_id, end_state);
    result
}

/// Time `work` and record it as a tool call.
///
/// On `Ok` the output is serialized into the event together with the
/// measured latency in milliseconds. On `Err` an error is recorded with
/// `{tool: name, input}` as context. Traces are never touched.
pub async fn tool<T, E, Fut>(
    ops: &AgentOps,
    name: &str,
    cost: Option<f64>,
    input: Value,
    work: Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    T: Serialize,
    E: Error + 'static,
{
    let started = Instant::now();
    let result = work.await;
    let latency_ms = started.elapsed().as_millis() as u64;

    let recorded = match &result {
        Ok(value) => {
            let output = serde_json::to_value(value).unwrap_or_else(|e| {
                debug!(tool = name, "tool output not serializable: {}", e);
                Value::Null
            });
            let mut call = ToolCall::new(name, input, output).with_latency(latency_ms);
            if let Some(cost) = cost {
                call = call.with_cost(cost);
            }
            ops.record_tool(call)
        }
        Err(e) => {
            let mut context = Map::new();
            context.insert("tool".to_string(), Value::String(name.to_string()));
            context.insert("input".to_string(), input);
            ops.record_error(e, Some(Value::Object(context)))
        }
    };
    if let Err(e) = recorded {
        debug!(tool = name, "tool call not recorded: {}", e);
    }
    result
}

/// Record that an agent was created.
///
/// Emits an `agent_created` action with `{name, args}` as params and
/// `{agentId: name}` as result.
pub fn register_agent(ops: &AgentOps, name: &str, args: Value) -> crate::Result<()> {
    ops.record_action(ActionRecord::new(
        "agent_created",
        json!({ "name": name, "args": args }),
        json!({ "agentId": name }),
    ))
}

/// Turn a Rust type path into a `Parent.item` operation name.
///
/// Generic arguments and compiler-generated segments such as `{{closure}}`
/// are dropped before the last two path segments are joined.
pub fn derive_operation_name(type_name: &str) -> String {
    let mut plain = String::with_capacity(type_name.len());
    let mut depth = 0usize;
    for c in type_name.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => plain.push(c),
            _ => {}
        }
    }

    let segments: Vec<&str> = plain
        .split("::")
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .collect();
    match segments.as_slice() {
        [] => "anonymous".to_string(),
        [only] => only.to_string(),
        [.., parent, item] => format!("{parent}.{item}"),
    }
}
