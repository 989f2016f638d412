// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Request body for POST /similarity in local mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityRequest {
    pub user_answer: String,
    pub ideal_answer: String,
}

impl SimilarityRequest {
    /// Both texts must contain something other than whitespace
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.user_answer.trim().is_empty() || self.ideal_answer.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "Both texts must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request body for POST /similarity in remote mode. Not validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteSimilarityRequest {
    pub text1: String,
    pub text2: String,
}
