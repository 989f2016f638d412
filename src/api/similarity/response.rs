// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// Response body for POST /similarity in local mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityResponse {
    /// Cosine similarity rounded to 4 decimals
    pub similarity: f64,
    pub user_answer: String,
    pub ideal_answer: String,
}

/// Response body for POST /similarity in remote mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteSimilarityResponse {
    /// Cosine similarity rounded to 4 decimals; 0.0 when the upstream failed
    pub similarity: f64,
}
