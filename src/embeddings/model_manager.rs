// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Resident embedding model
//!
//! Local mode keeps one model in memory for the lifetime of the process.
//! [`ModelHandle`] is the slot holding it: empty until the startup loader
//! installs the model, then read-only. Handlers query readiness through
//! [`ModelHandle::get`] before every use, so requests arriving while the
//! model is still loading are answered with 503 instead of blocking.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{OnnxEmbeddingModel, TextEmbedder};
use crate::config::LocalModelConfig;

/// ONNX export inside the sentence-transformers Hub repository
pub const HUB_MODEL_FILE: &str = "onnx/model.onnx";
pub const HUB_TOKENIZER_FILE: &str = "tokenizer.json";

/// Shared slot for the resident model
#[derive(Clone, Default)]
pub struct ModelHandle {
    model: Arc<RwLock<Option<Arc<dyn TextEmbedder>>>>,
}

impl ModelHandle {
    /// Creates an empty (not ready) handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle that is ready immediately
    pub fn with_model(model: Arc<dyn TextEmbedder>) -> Self {
        Self {
            model: Arc::new(RwLock::new(Some(model))),
        }
    }

    /// Installs the loaded model. The model can be installed only once.
    pub async fn install(&self, model: Arc<dyn TextEmbedder>) -> Result<()> {
        let mut slot = self.model.write().await;
        if let Some(existing) = slot.as_ref() {
            bail!(
                "Embedding model already loaded ({}); refusing to replace it",
                existing.model_name()
            );
        }
        *slot = Some(model);
        Ok(())
    }

    /// The model, or `None` while it is still loading
    pub async fn get(&self) -> Option<Arc<dyn TextEmbedder>> {
        self.model.read().await.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.model.read().await.is_some()
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ready = self
            .model
            .try_read()
            .map(|slot| slot.is_some().to_string())
            .unwrap_or_else(|_| "locked".to_string());
        f.debug_struct("ModelHandle").field("ready", &ready).finish()
    }
}

/// Paths of the files making up the local model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

/// Resolves model files, fetching from the HuggingFace Hub whatever is not
/// configured locally
pub async fn resolve_model_files(config: &LocalModelConfig) -> Result<ModelFiles> {
    if let (Some(model_path), Some(tokenizer_path)) = (&config.model_path, &config.tokenizer_path)
    {
        return Ok(ModelFiles {
            model_path: model_path.clone(),
            tokenizer_path: tokenizer_path.clone(),
        });
    }

    info!("Fetching model files from HuggingFace Hub repo {}", config.repo);
    let api = hf_hub::api::tokio::Api::new().context("Failed to create HuggingFace Hub client")?;
    let repo = api.model(config.repo.clone());

    let model_path = match &config.model_path {
        Some(path) => path.clone(),
        None => repo
            .get(HUB_MODEL_FILE)
            .await
            .with_context(|| format!("Failed to download {} from {}", HUB_MODEL_FILE, config.repo))?,
    };
    let tokenizer_path = match &config.tokenizer_path {
        Some(path) => path.clone(),
        None => repo
            .get(HUB_TOKENIZER_FILE)
            .await
            .with_context(|| {
                format!("Failed to download {} from {}", HUB_TOKENIZER_FILE, config.repo)
            })?,
    };

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
    })
}

/// Resolves the model files and loads the ONNX model
pub async fn load_model(config: &LocalModelConfig) -> Result<OnnxEmbeddingModel> {
    let files = resolve_model_files(config).await?;
    OnnxEmbeddingModel::new(
        config.model_name.clone(),
        &files.model_path,
        &files.tokenizer_path,
        config.expected_dimensions,
    )
    .await
}

/// Startup phase of local mode: loads the model in the background and
/// installs it into `handle`
///
/// A failed load is logged and leaves the handle empty, so /similarity and
/// /embed keep answering 503 while /health reports `ready: false`.
pub fn spawn_model_loader(handle: ModelHandle, config: LocalModelConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Loading model: {}", config.model_name);
        match load_model(&config).await {
            Ok(model) => match handle.install(Arc::new(model)).await {
                Ok(()) => info!("Model loaded and ready"),
                Err(e) => error!("{:#}", e),
            },
            Err(e) => {
                error!("Failed to load model {}: {:#}", config.model_name, e);
                error!("/similarity and /embed will return 503 Service Unavailable");
            }
        }
    })
}
