// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for the local-mode /similarity endpoint
//!
//! Used by answer-grading services. Any failure (service down, still
//! loading, timeout, bad body) yields `None` so the caller can fall back to
//! keyword scoring.

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::{SimilarityRequest, SimilarityResponse};

pub struct SimilarityClient {
    client: Client,
    base_url: String,
}

impl SimilarityClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Service root, e.g. `http://localhost:8000`
    /// * `timeout` - Bound on the whole request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Cosine similarity between the two answers, or `None` if the service
    /// is unavailable
    pub async fn get_similarity(&self, user_answer: &str, ideal_answer: &str) -> Option<f64> {
        match self.request_similarity(user_answer, ideal_answer).await {
            Ok(similarity) => {
                info!("Embedding similarity: {}", similarity);
                Some(similarity)
            }
            Err(e) => {
                warn!("Embedding service unavailable: {:#}", e);
                None
            }
        }
    }

    async fn request_similarity(&self, user_answer: &str, ideal_answer: &str) -> Result<f64> {
        let body = SimilarityRequest {
            user_answer: user_answer.to_string(),
            ideal_answer: ideal_answer.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/similarity", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: SimilarityResponse = response.json().await?;
        Ok(parsed.similarity)
    }
}
