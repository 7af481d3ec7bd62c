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


//! Event delivery transports
//!
//! A [`Transport`] performs one delivery attempt for one event. It reports
//! the outcome but never retries; retry and queuing are deliberately absent
//! from the delivery contract.

use crate::error::{AgentOpsError, Result};
use agentops_core::Event;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client as HttpClient;
use std::time::Duration;

/// One event addressed to one collector.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub endpoint: String,
    pub api_key: String,
    pub event: Event,
}

/// Sends a single event to the collector.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &DeliveryRequest) -> Result<()>;
}

/// HTTP transport: `POST <endpoint>` with a bearer token and the event as
/// the JSON body.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http_client: HttpClient,
}

impl HttpTransport {
    /// Transport without a request timeout.
    pub fn new() -> Self {
        Self {
            http_client: HttpClient::new(),
        }
    }

    /// Transport that abandons a request after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &DeliveryRequest) -> Result<()> {
        let response = self
            .http_client
            .post(&request.endpoint)
            .header("Content-Type", "application/json")
            .bearer_auth(&request.api_key)
            .json(&request.event)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AgentOpsError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Keeps delivered requests in memory instead of sending them.
///
/// Useful in tests and for hosts that want to inspect what would be sent.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    requests: Mutex<Vec<DeliveryRequest>>,
    fail_status: Option<u16>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that records every request and then rejects it with
    /// the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_status: Some(status),
        }
    }

    pub fn requests(&self) -> Vec<DeliveryRequest> {
        self.requests.lock().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.requests
            .lock()
            .iter()
            .map(|request| request.event.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: &DeliveryRequest) -> Result<()> {
        self.requests.lock().push(request.clone());
        match self.fail_status {
            Some(status) => Err(AgentOpsError::ApiError {
                status,
                message: "rejected by memory transport".into(),
            }),
            None => Ok(()),
        }
    }
}
