// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remote feature-extraction API client
//!
//! Sends `{"inputs": text}` to a HuggingFace-style inference endpoint and
//! reads back either a single vector `[f, ...]` or a batch-wrapped list
//! `[[f, ...], ...]`.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::TextEmbedder;
use crate::config::RemoteApiConfig;

/// Errors from the remote inference API
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The request did not complete within the configured timeout
    #[error("Inference request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Transport-level failure (connect, TLS, body read)
    #[error("Inference request failed: {0}")]
    Http(String),

    /// The endpoint answered with a non-success status
    #[error("Inference API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not an embedding vector
    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),
}

/// Client for a remote feature-extraction endpoint
pub struct RemoteEmbeddingClient {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    timeout_secs: u64,
}

impl RemoteEmbeddingClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the feature-extraction endpoint
    /// * `api_token` - Optional bearer token for higher rate limits
    /// * `timeout_secs` - Per-request timeout
    pub fn new(endpoint: &str, api_token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        info!(
            "Remote embedding client configured: endpoint={}, authenticated={}",
            endpoint,
            api_token.is_some()
        );

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_token,
            timeout_secs,
        })
    }

    pub fn from_config(config: &RemoteApiConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.api_token.clone(), config.timeout_secs)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the embedding of one text
    pub async fn fetch_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&json!({ "inputs": text }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        debug!("Inference POST {}", self.endpoint);
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| EmbeddingError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        parse_first_vector(value)
    }

    fn transport_error(&self, e: reqwest::Error) -> EmbeddingError {
        if e.is_timeout() {
            EmbeddingError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            EmbeddingError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl TextEmbedder for RemoteEmbeddingClient {
    fn model_name(&self) -> &str {
        &self.endpoint
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.fetch_embedding(text).await?)
    }
}

/// Extracts the embedding from a feature-extraction response
///
/// The shape is decided by the first element: if it is itself an array the
/// body is a batch and its first vector is returned, otherwise the body is
/// the vector. A batch of 1-dimensional vectors (`[[x]]`) and a bare vector
/// cannot be told apart by shape alone; this follows the first-element rule.
pub fn parse_first_vector(value: Value) -> Result<Vec<f32>, EmbeddingError> {
    let Value::Array(items) = value else {
        return Err(EmbeddingError::MalformedResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&value)
        )));
    };

    let vector = match items.first() {
        None => {
            return Err(EmbeddingError::MalformedResponse(
                "empty embedding array".to_string(),
            ))
        }
        Some(Value::Array(_)) => items.into_iter().next().unwrap_or(Value::Null),
        Some(_) => Value::Array(items),
    };

    serde_json::from_value::<Vec<f32>>(vector)
        .map_err(|e| EmbeddingError::MalformedResponse(format!("not a vector of numbers: {}", e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
