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


//! Instrumentation wrappers recorded through the in-memory transport

use agentops_client::{instrument, AgentOps, EventKind, InitOptions, MemoryTransport};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("search backend down")]
struct SearchError;

async fn sample_work(input: u32) -> Result<u32, SearchError> {
    Ok(input * 2)
}

async fn search(query: &str) -> Result<Vec<String>, SearchError> {
    if query.is_empty() {
        return Err(SearchError);
    }
    Ok(vec![format!("{query} result 1"), format!("{query} result 2")])
}

fn tracked() -> (AgentOps, Arc<MemoryTransport>) {
    let transport = Arc::new(MemoryTransport::new());
    let ops = AgentOps::with_transport(transport.clone());
    ops.init("key1", InitOptions::default());
    (ops, transport)
}

#[tokio::test]
async fn test_operation_derives_trace_name() {
    let (ops, transport) = tracked();
    let doubled = instrument::operation(&ops, None, sample_work(21)).await.unwrap();
    assert_eq!(doubled, 42);
    assert!(ops.active_traces().is_empty());

    ops.flush().await;
    let events = transport.events();
    let start = serde_json::to_value(&events[1]).unwrap();
    let trace_name = start["data"]["trace_name"].as_str().unwrap();
    assert!(trace_name.ends_with("sample_work"), "{trace_name}");
    assert_eq!(start["data"]["tags"], json!(["operation"]));

    let end = serde_json::to_value(&events[2]).unwrap();
    assert_eq!(end["data"]["end_state"], "Success");
}

#[tokio::test]
async fn test_operation_failure_records_error_and_fails_trace() {
    let (ops, transport) = tracked();
    let result = instrument::operation(&ops, Some("lookup"), search("")).await;
    assert!(result.is_err());

    ops.flush().await;
    let types: Vec<_> = transport.events().iter().map(|e| e.event_type()).collect();
    assert_eq!(types, ["session_start", "trace_start", "error", "trace_end"]);

    let events = transport.events();
    let error = serde_json::to_value(&events[2]).unwrap();
    assert_eq!(error["data"]["error"], "search backend down");
    assert_eq!(error["data"]["context"], json!({"operation": "lookup"}));
    let end = serde_json::to_value(&events[3]).unwrap();
    assert_eq!(end["data"]["end_state"], "Fail");
}

#[tokio::test]
async fn test_trace_wrapper_uses_trace_context() {
    let (ops, transport) = tracked();
    let tags = Some(vec!["workflow".to_string(), "ai".to_string()]);
    let result = instrument::trace(&ops, "complex_workflow", tags, search("")).await;
    assert!(result.is_err());

    ops.flush().await;
    let events = transport.events();
    let start = serde_json::to_value(&events[1]).unwrap();
    assert_eq!(start["data"]["tags"], json!(["workflow", "ai"]));
    let error = serde_json::to_value(&events[2]).unwrap();
    assert_eq!(error["data"]["context"], json!({"trace": "complex_workflow"}));
}

#[tokio::test]
async fn test_tool_records_output_cost_and_latency() {
    let (ops, transport) = tracked();
    let hits = instrument::tool(&ops, "web_search", Some(0.05), json!(["rust"]), search("rust"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);

    ops.flush().await;
    let event = transport.events().pop().unwrap();
    assert_eq!(event.kind(), EventKind::Tool);
    assert!(event.trace_id().is_none());

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["data"]["name"], "web_search");
    assert_eq!(value["data"]["input"], json!(["rust"]));
    assert_eq!(value["data"]["output"], json!(["rust result 1", "rust result 2"]));
    assert_eq!(value["data"]["cost"], 0.05);
    assert!(value["data"]["latency"].is_u64());
}

#[tokio::test]
async fn test_tool_failure_records_input_context() {
    let (ops, transport) = tracked();
    let result = instrument::tool(&ops, "web_search", None, json!({"q": ""}), search("")).await;
    assert!(result.is_err());

    ops.flush().await;
    let event = transport.events().pop().unwrap();
    assert_eq!(event.kind(), EventKind::Error);
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value["data"]["context"],
        json!({"tool": "web_search", "input": {"q": ""}})
    );
    // tool wrapper never opens a trace
    assert_eq!(ops.delivery_stats().submitted, 2);
}

#[tokio::test]
async fn test_wrappers_run_untracked_before_init() {
    let transport = Arc::new(MemoryTransport::new());
    let ops = AgentOps::with_transport(transport.clone());

    assert_eq!(instrument::operation(&ops, None, sample_work(2)).await.unwrap(), 4);
    assert!(instrument::tool(&ops, "web_search", None, json!(null), search("x"))
        .await
        .is_ok());

    ops.flush().await;
    assert!(transport.is_empty());
}

#[tokio::test]
async fn test_register_agent_action() {
    let (ops, transport) = tracked();
    instrument::register_agent(&ops, "ResearchAgent", json!(["web"])).unwrap();

    ops.flush().await;
    let value = serde_json::to_value(transport.events().pop().unwrap()).unwrap();
    assert_eq!(value["type"], "action");
    assert_eq!(value["data"]["action"], "agent_created");
    assert_eq!(value["data"]["params"], json!({"name": "ResearchAgent", "args": ["web"]}));
    assert_eq!(value["data"]["result"], json!({"agentId": "ResearchAgent"}));
}
