// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /similarity for both service modes
//!
//! Local mode validates input and fails loudly (400/503/500). Remote mode
//! never surfaces upstream failures: it answers `{"similarity": 0.0}` so the
//! consumer falls back to keyword scoring.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{
    remote_similarity_handler, score_remote, similarity_handler, FALLBACK_SIMILARITY,
};
pub use request::{RemoteSimilarityRequest, SimilarityRequest};
pub use response::{RemoteSimilarityResponse, SimilarityResponse};
