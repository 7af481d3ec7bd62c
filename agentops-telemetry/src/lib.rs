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


//! AgentOps telemetry (logging + delivery metrics).

pub mod metrics;

use opentelemetry::metrics::MeterProvider;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use metrics::DeliveryMetrics;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Metrics pipeline error: {0}")]
    Metrics(#[from] opentelemetry::metrics::MetricsError),

    #[error("Logging already initialized: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output for terminals
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global `tracing` subscriber.
///
/// Logs go to stderr so stdout stays free for command output. `RUST_LOG`
/// wins over `verbose` when set. Fails if a global subscriber is already
/// installed.
pub fn init_logging(format: LogFormat, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            registry.with(fmt_layer).try_init()?;
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr);
            registry.with(fmt_layer).try_init()?;
        }
    }
    Ok(())
}

/// Build the meter provider and delivery metrics.
///
/// Exports over OTLP/gRPC when `otlp_endpoint` is given, otherwise the
/// counters are kept in-process only. The OTLP pipeline needs a Tokio
/// runtime.
pub fn init_metrics(
    service_name: &str,
    otlp_endpoint: Option<&str>,
) -> Result<(SdkMeterProvider, DeliveryMetrics)> {
    let meter_provider = if let Some(endpoint) = otlp_endpoint {
        tracing::debug!(endpoint, "exporting delivery metrics over OTLP");
        opentelemetry_otlp::new_pipeline()
            .metrics(opentelemetry_sdk::runtime::Tokio)
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(endpoint),
            )
            .with_resource(opentelemetry_sdk::Resource::new(vec![KeyValue::new(
                "service.name",
                service_name.to_string(),
            )]))
            .build()?
    } else {
        SdkMeterProvider::default()
    };

    let meter = meter_provider.meter(service_name.to_string());
    let metrics = DeliveryMetrics::new(&meter);
    Ok((meter_provider, metrics))
}
