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


//! AgentOps CLI
//!
//! Command-line host for the AgentOps tracking client: runs the demo
//! scenarios and reports the session read-out.

mod demo;

use agentops_client::{
    api_key_from_env, AgentOps, HttpTransport, InitOptions, SessionInfo, TraceState,
};
use agentops_telemetry::{init_logging, init_metrics, LogFormat};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use demo::{Assistant, Scenario};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "agentops")]
#[command(about = "AgentOps - session, trace and event tracking", long_about = None)]
struct Cli {
    /// TOML file with init options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key (falls back to AGENTOPS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Collector endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    /// Track locally without an API key; nothing is sent
    #[arg(long)]
    offline: bool,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    /// Export delivery metrics to this OTLP endpoint
    #[arg(long)]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a demo scenario
    Demo {
        /// Scenario to run
        #[arg(value_enum, default_value = "all")]
        scenario: Scenario,

        /// Prompt or query passed to the scenario
        #[arg(long)]
        input: Option<String>,

        /// Simulated model latency in milliseconds
        #[arg(long, default_value = "1000")]
        latency_ms: u64,
    },

    /// Show the active session
    Status,
}

#[derive(serde::Serialize)]
struct StatusReport<'a> {
    initialized: bool,
    session: &'a SessionInfo,
    delivery: agentops_client::DeliveryStats,
}

/// Defaults, then the config file, then `AGENTOPS_*` variables, then flags.
fn init_options(cli: &Cli) -> Result<InitOptions> {
    let mut options = InitOptions::default()
        .with_tags(vec!["cli".to_string(), "demo".to_string()])
        .with_trace_name("CLI Session");

    if let Some(path) = &cli.config {
        let file = InitOptions::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        options = options.merge(file);
    }
    options = options.merge(InitOptions::from_env());

    if let Some(endpoint) = &cli.endpoint {
        options = options.with_endpoint(endpoint.clone());
    }
    Ok(options)
}

fn print_session(info: &SessionInfo) {
    match &info.session_id {
        Some(id) => {
            println!("Session ID:     {}", id);
            if let Some(start) = info.session_start_time {
                println!("Started:        {} ms", start);
            }
        }
        None => println!("Session ID:     none"),
    }
    println!("Active traces:  {}", info.active_traces);
    println!("Total events:   {}", info.total_events);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(format, cli.verbose).context("Failed to initialize logging")?;

    let (meter_provider, metrics) = init_metrics("agentops-cli", cli.otlp_endpoint.as_deref())
        .context("Failed to initialize metrics")?;

    let ops = AgentOps::with_transport(Arc::new(HttpTransport::new()))
        .with_observer(Arc::new(metrics));

    let api_key = cli.api_key.clone().or_else(api_key_from_env);
    match (api_key, cli.offline) {
        (Some(key), _) => {
            ops.init(key, init_options(&cli)?);
        }
        (None, true) => {
            ops.init("", init_options(&cli)?);
        }
        (None, false) => {
            warn!("AgentOps API key not found, tracking disabled (use --api-key or --offline)");
        }
    }

    match &cli.command {
        Commands::Demo {
            scenario,
            input,
            latency_ms,
        } => {
            if !ops.is_initialized() {
                println!("✗ AgentOps not configured");
                return Ok(());
            }

            let assistant = Assistant::new(&ops, Duration::from_millis(*latency_ms));
            for scenario in scenario.expand() {
                let report = assistant.run(scenario, input.as_deref()).await;
                if cli.json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    match (&report.output, &report.error) {
                        (Some(output), _) => println!("✓ {:?}: {}", scenario, output),
                        (None, Some(error)) => println!("✗ {:?}: {}", scenario, error),
                        (None, None) => {}
                    }
                }
            }

            let info = ops.session_info();
            if cli.json {
                println!("{}", serde_json::to_string(&info)?);
            } else {
                println!();
                print_session(&info);
            }
        }

        Commands::Status => {
            let info = ops.session_info();
            if cli.json {
                let report = StatusReport {
                    initialized: ops.is_initialized(),
                    session: &info,
                    delivery: ops.delivery_stats(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "AgentOps:       {}",
                    if ops.is_initialized() {
                        "initialized"
                    } else {
                        "not configured"
                    }
                );
                print_session(&info);
            }
        }
    }

    if ops.is_initialized() {
        ops.end_session(TraceState::Success)?;
    }
    ops.flush().await;

    let stats = ops.delivery_stats();
    info!(
        submitted = stats.submitted,
        delivered = stats.delivered,
        failed = stats.failed,
        suppressed = stats.suppressed,
        "AgentOps delivery summary"
    );

    meter_provider
        .shutdown()
        .context("Failed to shut down metrics")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_defaults_to_all() {
        let cli = Cli::try_parse_from(["agentops", "--offline", "demo"]).unwrap();
        assert!(cli.offline);
        match cli.command {
            Commands::Demo {
                scenario,
                input,
                latency_ms,
            } => {
                assert_eq!(scenario, Scenario::All);
                assert!(input.is_none());
                assert_eq!(latency_ms, 1000);
            }
            Commands::Status => panic!("expected demo"),
        }
    }

    #[test]
    fn test_endpoint_flag_wins() {
        let cli = Cli::try_parse_from([
            "agentops",
            "--endpoint",
            "http://localhost:4318/v2/events",
            "status",
        ])
        .unwrap();
        let options = init_options(&cli).unwrap();
        assert_eq!(
            options.endpoint.as_deref(),
            Some("http://localhost:4318/v2/events")
        );
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let cli = Cli::try_parse_from(["agentops", "--config", "/nonexistent/agentops.toml", "status"])
            .unwrap();
        let err = init_options(&cli).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/agentops.toml"));
    }
}
