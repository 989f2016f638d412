// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod embeddings;
pub mod similarity;
pub mod version;

pub use client::SimilarityClient;
pub use config::{ServiceConfig, ServiceMode};
pub use embeddings::{ModelHandle, OnnxEmbeddingModel, RemoteEmbeddingClient, TextEmbedder};
pub use similarity::{cosine_similarity, round_score, smoothed_cosine_similarity};
