// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use similarity_service::{
    api::{create_local_app, create_remote_app, serve, LocalState, RemoteState},
    cli::Cli,
    config::{ServiceConfig, ServiceMode},
    embeddings::{spawn_model_loader, ModelHandle, RemoteEmbeddingClient},
    version,
};
use std::{env, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.apply(ServiceConfig::from_env()?);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!("Starting {}", version::get_version_string());
    info!("Build: {}", version::get_build_info());
    info!("Mode: {}", config.mode);

    let addr = config.socket_addr()?;
    let app = match config.mode {
        ServiceMode::Local => {
            // The server accepts requests while the model loads; they get 503 until it is ready
            let model = ModelHandle::new();
            spawn_model_loader(model.clone(), config.local.clone());
            create_local_app(LocalState::new(model, config.local.model_name.clone()))
        }
        ServiceMode::Remote => {
            let client = RemoteEmbeddingClient::from_config(&config.remote)?;
            create_remote_app(RemoteState::new(Arc::new(client)))
        }
    };

    serve(app, addr).await
}
