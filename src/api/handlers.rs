// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::http_server::{LocalState, RemoteState};

/// Mode reported by the remote service's /health
pub const REMOTE_MODE: &str = "remote-api";

/// GET /health body in local mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub ready: bool,
}

/// GET /health body in remote mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteHealthResponse {
    pub status: String,
    pub ready: bool,
    pub mode: String,
}

/// GET /health (local). Reports whether the resident model has loaded.
pub async fn local_health_handler(State(state): State<LocalState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model_name.clone(),
        ready: state.model.is_ready().await,
    })
}

/// GET /health (remote). Nothing to load, so always ready.
pub async fn remote_health_handler(State(_state): State<RemoteState>) -> Json<RemoteHealthResponse> {
    Json(RemoteHealthResponse {
        status: "ok".to_string(),
        ready: true,
        mode: REMOTE_MODE.to_string(),
    })
}
