// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::api::http_server::{LocalState, RemoteState};
use crate::api::similarity::{
    RemoteSimilarityRequest, RemoteSimilarityResponse, SimilarityRequest, SimilarityResponse,
};
use crate::api::ApiError;
use crate::embeddings::TextEmbedder;
use crate::similarity::{cosine_similarity, round_score, smoothed_cosine_similarity};

/// Score reported by remote mode when the inference API fails.
///
/// The answer-grading consumer treats 0.0 as "no semantic signal" and falls
/// back to keyword scoring, so an upstream outage degrades grading instead of
/// failing the consumer's request.
pub const FALLBACK_SIMILARITY: f64 = 0.0;

/// POST /similarity (local)
///
/// # Errors
/// - 503 while the model is still loading
/// - 400 if either text is empty or whitespace-only
/// - 500 if inference fails
pub async fn similarity_handler(
    State(state): State<LocalState>,
    Json(request): Json<SimilarityRequest>,
) -> Result<Json<SimilarityResponse>, ApiError> {
    let model = state.model.get().await.ok_or(ApiError::NotReady)?;
    request.validate()?;

    let (user_vec, ideal_vec) = model
        .embed_pair(&request.user_answer, &request.ideal_answer)
        .await
        .map_err(ApiError::inference)?;

    let similarity = cosine_similarity(&user_vec, &ideal_vec);
    info!("Similarity computed: {:.4}", similarity);

    Ok(Json(SimilarityResponse {
        similarity: round_score(similarity),
        user_answer: request.user_answer,
        ideal_answer: request.ideal_answer,
    }))
}

/// POST /similarity (remote)
///
/// Always 200. Upstream failures are logged and reported as
/// [`FALLBACK_SIMILARITY`].
pub async fn remote_similarity_handler(
    State(state): State<RemoteState>,
    Json(request): Json<RemoteSimilarityRequest>,
) -> Json<RemoteSimilarityResponse> {
    let scored = score_remote(state.embedder.as_ref(), &request.text1, &request.text2).await;
    let similarity = match scored {
        Ok(score) => {
            info!("Similarity computed: {:.4}", score);
            round_score(score)
        }
        Err(e) => {
            warn!("Similarity unavailable, reporting {}: {:#}", FALLBACK_SIMILARITY, e);
            FALLBACK_SIMILARITY
        }
    };

    Json(RemoteSimilarityResponse { similarity })
}

/// Fetches both embeddings (sequentially) and scores them
pub async fn score_remote(
    embedder: &dyn TextEmbedder,
    text1: &str,
    text2: &str,
) -> anyhow::Result<f64> {
    let (a, b) = embedder.embed_pair(text1, text2).await?;
    Ok(smoothed_cosine_similarity(&a, &b))
}
