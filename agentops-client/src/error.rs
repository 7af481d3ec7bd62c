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


//! AgentOps client errors.

use thiserror::Error;

/// AgentOps client errors.
///
/// Only [`AgentOpsError::NotInitialized`] is ever returned from the tracking
/// operations on [`crate::AgentOps`]. The remaining variants describe delivery
/// failures; they are logged and handed to observers, never propagated.
#[derive(Error, Debug)]
pub enum AgentOpsError {
    #[error("AgentOps not initialized")]
    NotInitialized,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("No Tokio runtime available to deliver event")]
    NoRuntime,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for AgentOps operations.
pub type Result<T> = std::result::Result<T, AgentOpsError>;
