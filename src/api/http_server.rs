// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{
    embed::embed_handler,
    handlers::{local_health_handler, remote_health_handler},
    similarity::{remote_similarity_handler, similarity_handler},
};
use crate::embeddings::{ModelHandle, TextEmbedder};

/// State shared by local-mode handlers
#[derive(Clone, Debug)]
pub struct LocalState {
    pub model: ModelHandle,
    pub model_name: String,
}

impl LocalState {
    pub fn new(model: ModelHandle, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }
}

/// State shared by remote-mode handlers
#[derive(Clone)]
pub struct RemoteState {
    pub embedder: Arc<dyn TextEmbedder>,
}

impl RemoteState {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }
}

/// Router for the local-model service
pub fn create_local_app(state: LocalState) -> Router {
    Router::new()
        .route("/health", get(local_health_handler))
        .route("/similarity", post(similarity_handler))
        .route("/embed", post(embed_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router for the remote-API service
pub fn create_remote_app(state: RemoteState) -> Router {
    Router::new()
        .route("/health", get(remote_health_handler))
        .route("/similarity", post(remote_similarity_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve `app` on `addr` until Ctrl-C
pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
