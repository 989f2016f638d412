// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use tracing::debug;

use crate::api::embed::{EmbedRequest, EmbedResponse};
use crate::api::http_server::LocalState;
use crate::api::ApiError;

/// POST /embed handler
///
/// # Errors
/// - 503 while the model is still loading
/// - 500 if inference fails
pub async fn embed_handler(
    State(state): State<LocalState>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let model = state.model.get().await.ok_or(ApiError::NotReady)?;

    let embedding = model
        .embed(&request.text)
        .await
        .map_err(ApiError::inference)?;

    debug!("Embedded text into {} dimensions", embedding.len());
    Ok(Json(EmbedResponse::from(embedding)))
}
