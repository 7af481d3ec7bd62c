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


//! Demo scenarios exercising every part of the tracking client.

use agentops_client::{instrument, ActionRecord, AgentOps, LlmCall, TraceState};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// `generate_response` operation recording an LLM call
    Simple,
    /// `web_search` tool call
    Tool,
    /// `complex_workflow` trace running search then generate
    Workflow,
    /// Trace started and ended by hand around two actions
    Manual,
    /// Every scenario in order
    All,
}

impl Scenario {
    pub fn expand(self) -> Vec<Scenario> {
        match self {
            Scenario::All => vec![
                Scenario::Simple,
                Scenario::Tool,
                Scenario::Workflow,
                Scenario::Manual,
            ],
            other => vec![other],
        }
    }

    /// Context label used when a scenario's error is recorded.
    fn operation(self) -> &'static str {
        match self {
            Scenario::Simple => "simple_operation",
            Scenario::Tool => "tool_usage",
            Scenario::Workflow => "complex_workflow",
            Scenario::Manual => "manual_trace",
            Scenario::All => "all",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error("Tracking failed: {0}")]
    Tracking(#[from] agentops_client::AgentOpsError),
}

/// Result of one scenario run.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub output: Option<String>,
    pub error: Option<String>,
}

/// Simulated assistant; `latency` stands in for model and search time.
pub struct Assistant<'a> {
    ops: &'a AgentOps,
    latency: Duration,
}

impl<'a> Assistant<'a> {
    pub fn new(ops: &'a AgentOps, latency: Duration) -> Self {
        Self { ops, latency }
    }

    pub async fn generate_response(&self, prompt: &str) -> Result<String, AssistantError> {
        instrument::operation(self.ops, Some("generate_response"), async {
            if prompt.trim().is_empty() {
                return Err(AssistantError::EmptyPrompt);
            }
            sleep(self.latency).await;

            let response = format!("AI Response to: {prompt}");
            self.ops.record_llm(
                LlmCall::new("gpt-3.5-turbo", prompt, response.clone())
                    .with_tokens(100)
                    .with_cost(0.001)
                    .with_latency(self.latency.as_millis() as u64),
            )?;
            Ok(response)
        })
        .await
    }

    pub async fn search_web(&self, query: &str) -> Result<String, AssistantError> {
        instrument::tool(self.ops, "web_search", Some(0.05), json!([query]), async {
            if query.trim().is_empty() {
                return Err(AssistantError::EmptyQuery);
            }
            sleep(self.latency / 2).await;
            Ok(format!("Search results for: {query}"))
        })
        .await
    }

    pub async fn complex_workflow(&self, task: &str) -> Result<String, AssistantError> {
        let tags = Some(vec!["workflow".to_string(), "ai".to_string()]);
        instrument::trace(self.ops, "complex_workflow", tags, async {
            let search_result = self.search_web(task).await?;
            let response = self
                .generate_response(&format!(
                    "Based on search: {search_result}, please respond to: {task}"
                ))
                .await?;
            Ok::<String, AssistantError>(response)
        })
        .await
    }

    pub async fn manual_trace(&self) -> Result<String, AssistantError> {
        let trace_id = self
            .ops
            .start_trace("Manual Trace Example", Some(vec!["manual".into(), "demo".into()]))?;

        self.ops.record_action(ActionRecord::new(
            "user_interaction",
            json!({ "button": "manual_trace" }),
            json!({ "started": true }),
        ))?;
        sleep(self.latency).await;
        self.ops.record_action(ActionRecord::new(
            "process_complete",
            json!({ "duration": self.latency.as_millis() as u64 }),
            json!({ "success": true }),
        ))?;

        self.ops.end_trace(&trace_id, TraceState::Success)?;
        Ok("Manual trace completed successfully".to_string())
    }

    /// Run one scenario. Failures are recorded on the client and reported,
    /// never propagated.
    pub async fn run(&self, scenario: Scenario, input: Option<&str>) -> ScenarioReport {
        debug!(?scenario, "running demo scenario");
        let result = match scenario {
            Scenario::Simple => {
                self.generate_response(input.unwrap_or("Hello, how are you?"))
                    .await
            }
            Scenario::Tool => {
                self.search_web(input.unwrap_or("Rust async best practices"))
                    .await
            }
            Scenario::Workflow => {
                self.complex_workflow(input.unwrap_or("How to optimize Tokio task scheduling?"))
                    .await
            }
            Scenario::Manual => self.manual_trace().await,
            Scenario::All => Ok(String::new()),
        };

        match result {
            Ok(output) => ScenarioReport {
                scenario,
                output: Some(output),
                error: None,
            },
            Err(e) => {
                let _ = self
                    .ops
                    .record_error(&e, Some(json!({ "operation": scenario.operation() })));
                ScenarioReport {
                    scenario,
                    output: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentops_client::{EventKind, InitOptions, MemoryTransport};
    use std::sync::Arc;

    fn tracked() -> (AgentOps, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new());
        let ops = AgentOps::with_transport(transport.clone());
        ops.init("key1", InitOptions::default());
        (ops, transport)
    }

    #[test]
    fn test_all_expands_in_order() {
        assert_eq!(
            Scenario::All.expand(),
            [
                Scenario::Simple,
                Scenario::Tool,
                Scenario::Workflow,
                Scenario::Manual
            ]
        );
        assert_eq!(Scenario::Tool.expand(), [Scenario::Tool]);
    }

    #[tokio::test]
    async fn test_workflow_nests_tool_and_operation() {
        let (ops, transport) = tracked();
        let assistant = Assistant::new(&ops, Duration::ZERO);
        let report = assistant.run(Scenario::Workflow, Some("rust")).await;
        assert_eq!(
            report.output.as_deref(),
            Some("AI Response to: Based on search: Search results for: rust, please respond to: rust")
        );
        assert!(ops.active_traces().is_empty());

        ops.flush().await;
        let types: Vec<_> = transport.events().iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            [
                "session_start",
                "trace_start",
                "tool_call",
                "trace_start",
                "llm_call",
                "trace_end",
                "trace_end",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_scenario_is_recorded() {
        let (ops, transport) = tracked();
        let assistant = Assistant::new(&ops, Duration::ZERO);
        let report = assistant.run(Scenario::Simple, Some("  ")).await;
        assert_eq!(report.error.as_deref(), Some("Prompt must not be empty"));

        ops.flush().await;
        let events = transport.events();
        let errors: Vec<_> = events
            .iter()
            .filter(|e| e.kind() == EventKind::Error)
            .map(|e| serde_json::to_value(e).unwrap()["data"]["context"].clone())
            .collect();
        assert_eq!(
            errors,
            [
                json!({ "operation": "generate_response" }),
                json!({ "operation": "simple_operation" }),
            ]
        );
    }

    #[tokio::test]
    async fn test_manual_trace_records_two_actions() {
        let (ops, _) = tracked();
        let assistant = Assistant::new(&ops, Duration::ZERO);
        let report = assistant.run(Scenario::Manual, None).await;
        assert_eq!(
            report.output.as_deref(),
            Some("Manual trace completed successfully")
        );

        let session = ops.active_session().unwrap();
        let actions = session
            .events()
            .iter()
            .filter(|e| e.kind() == EventKind::Action)
            .count();
        assert_eq!(actions, 2);
    }
}
