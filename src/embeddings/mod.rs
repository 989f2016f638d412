// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding providers
//!
//! Both service modes obtain vectors through [`TextEmbedder`]:
//! - [`OnnxEmbeddingModel`] runs all-MiniLM-L6-v2 in-process (local mode)
//! - [`RemoteEmbeddingClient`] calls a feature-extraction API (remote mode)

pub mod model_manager;
pub mod onnx_model;
pub mod remote;

pub use model_manager::{
    load_model, resolve_model_files, spawn_model_loader, ModelFiles, ModelHandle,
};
pub use onnx_model::OnnxEmbeddingModel;
pub use remote::{parse_first_vector, EmbeddingError, RemoteEmbeddingClient};

use anyhow::Result;
use async_trait::async_trait;

/// Produces embedding vectors for text
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Name reported to callers (e.g. "all-MiniLM-L6-v2")
    fn model_name(&self) -> &str;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed two texts for a similarity comparison
    ///
    /// The default issues two sequential [`embed`](Self::embed) calls.
    /// Providers that can batch override this.
    async fn embed_pair(&self, first: &str, second: &str) -> Result<(Vec<f32>, Vec<f32>)> {
        let first = self.embed(first).await?;
        let second = self.embed(second).await?;
        Ok((first, second))
    }
}
