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


//! Client configuration
//!
//! [`InitOptions`] is what a host passes to [`crate::AgentOps::init`]. It can be
//! assembled from code, a TOML file, or `AGENTOPS_*` environment variables,
//! and layered with [`InitOptions::merge`]. `init` resolves it into an
//! [`AgentOpsConfig`] that stays fixed for the life of the client.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Collector endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.agentops.ai/v2/events";

/// Optional settings accepted by `init`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitOptions {
    /// Default tags for sessions started without explicit tags
    pub tags: Option<Vec<String>>,
    /// Default trace-name label for new sessions
    pub trace_name: Option<String>,
    /// Start a session during `init` (default: true)
    pub auto_start_session: Option<bool>,
    /// Collector URL override
    pub endpoint: Option<String>,
}

impl InitOptions {
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_trace_name(mut self, trace_name: impl Into<String>) -> Self {
        self.trace_name = Some(trace_name.into());
        self
    }

    pub fn with_auto_start_session(mut self, auto_start: bool) -> Self {
        self.auto_start_session = Some(auto_start);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Load options from a TOML file.
    ///
    /// ```toml
    /// tags = ["website", "blog"]
    /// trace_name = "Website Session"
    /// auto_start_session = true
    /// endpoint = "https://api.agentops.ai/v2/events"
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = toml::from_str(&content)?;
        Ok(options)
    }

    /// Load options from environment variables
    ///
    /// Supported environment variables:
    /// - AGENTOPS_TAGS: Comma-separated default tags
    /// - AGENTOPS_TRACE_NAME: Default trace-name label
    /// - AGENTOPS_AUTO_START_SESSION: `true` or `false`
    /// - AGENTOPS_ENDPOINT: Collector URL override
    pub fn from_env() -> Self {
        Self {
            tags: env::var("AGENTOPS_TAGS").ok().map(|raw| parse_tags(&raw)),
            trace_name: env::var("AGENTOPS_TRACE_NAME")
                .ok()
                .filter(|v| !v.is_empty()),
            auto_start_session: env::var("AGENTOPS_AUTO_START_SESSION")
                .ok()
                .and_then(|v| v.trim().to_ascii_lowercase().parse().ok()),
            endpoint: env::var("AGENTOPS_ENDPOINT").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: InitOptions) -> Self {
        Self {
            tags: other.tags.or(self.tags),
            trace_name: other.trace_name.or(self.trace_name),
            auto_start_session: other.auto_start_session.or(self.auto_start_session),
            endpoint: other.endpoint.or(self.endpoint),
        }
    }
}

/// Read the API key from `AGENTOPS_API_KEY`, treating an empty value as unset.
pub fn api_key_from_env() -> Option<String> {
    env::var("AGENTOPS_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// Resolved configuration, fixed at `init`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOpsConfig {
    /// Bearer token; empty means delivery is suppressed
    pub api_key: String,
    pub tags: Option<Vec<String>>,
    pub trace_name: Option<String>,
    pub auto_start_session: bool,
    pub endpoint: String,
}

impl AgentOpsConfig {
    pub fn new(api_key: impl Into<String>, options: InitOptions) -> Self {
        Self {
            api_key: api_key.into(),
            tags: options.tags,
            trace_name: options.trace_name,
            auto_start_session: options.auto_start_session != Some(false),
            endpoint: options
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}
