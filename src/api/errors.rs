// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Error body returned by local-mode endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Model still loading; callers should retry later
    #[error("Model not loaded yet")]
    NotReady,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Embedding failed: {0}")]
    Inference(String),
}

impl ApiError {
    pub fn inference(err: anyhow::Error) -> Self {
        ApiError::Inference(format!("{:#}", err))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotReady => 503,
            ApiError::InvalidInput(_) => 400,
            ApiError::Inference(_) => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            detail: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Inference(message) = &self {
            error!("Inference failed: {}", message);
        }
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
