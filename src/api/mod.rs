// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod similarity;

pub use embed::{embed_handler, EmbedRequest, EmbedResponse};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{HealthResponse, RemoteHealthResponse, REMOTE_MODE};
pub use http_server::{create_local_app, create_remote_app, serve, LocalState, RemoteState};
pub use similarity::{
    remote_similarity_handler, similarity_handler, RemoteSimilarityRequest,
    RemoteSimilarityResponse, SimilarityRequest, SimilarityResponse, FALLBACK_SIMILARITY,
};
