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


//! End-to-end delivery over HTTP against a mock collector

use agentops_client::{AgentOps, InitOptions, LlmCall, TraceState};
use mockito::Matcher;
use serde_json::json;

fn options(server: &mockito::ServerGuard) -> InitOptions {
    InitOptions::default()
        .with_endpoint(format!("{}/v2/events", server.url()))
        .with_tags(vec!["web".into()])
}

#[tokio::test]
async fn test_events_posted_with_bearer_key() {
    let mut server = mockito::Server::new_async().await;
    let session_start = server
        .mock("POST", "/v2/events")
        .match_header("authorization", "Bearer key1")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "type": "custom",
            "data": {"event_type": "session_start", "tags": ["web"]}
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let llm = server
        .mock("POST", "/v2/events")
        .match_header("authorization", "Bearer key1")
        .match_body(Matcher::PartialJson(json!({
            "type": "llm",
            "data": {"event_type": "llm_call", "model": "gpt-4o", "tokens": 42}
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let ops = AgentOps::new();
    ops.init("key1", options(&server));
    ops.record_llm(LlmCall::new("gpt-4o", "Hello", "Hi").with_tokens(42))
        .unwrap();
    ops.flush().await;

    session_start.assert_async().await;
    llm.assert_async().await;
    assert_eq!(ops.delivery_stats().delivered, 2);
}

#[tokio::test]
async fn test_rejected_events_are_dropped() {
    let mut server = mockito::Server::new_async().await;
    let rejected = server
        .mock("POST", "/v2/events")
        .with_status(503)
        .with_body("collector unavailable")
        .expect(3)
        .create_async()
        .await;

    let ops = AgentOps::new();
    ops.init("key1", options(&server));
    let trace_id = ops.start_trace("checkout", None).unwrap();
    ops.end_trace(&trace_id, TraceState::Fail).unwrap();
    ops.flush().await;

    // each event is attempted exactly once
    rejected.assert_async().await;
    let stats = ops.delivery_stats();
    assert_eq!(stats.failed, 3);
    assert_eq!(stats.pending(), 0);
    assert!(ops.active_traces().is_empty());
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let never = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let ops = AgentOps::new();
    ops.init("", options(&server));
    ops.start_trace("offline", None).unwrap();
    ops.end_session(TraceState::Success).unwrap();
    ops.flush().await;

    never.assert_async().await;
    assert_eq!(ops.delivery_stats().suppressed, 3);
}
