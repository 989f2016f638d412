// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration loaded from environment variables

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Default embedding model served in local mode
pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// HuggingFace Hub repository the local model is fetched from when no paths are set
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Feature-extraction endpoint used by remote mode
pub const DEFAULT_INFERENCE_API_URL: &str =
    "https://api-inference.huggingface.co/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2";

/// Remote inference request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// How embeddings are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServiceMode {
    /// Embedding model resident in this process
    Local,
    /// Embeddings fetched from a remote inference API
    #[value(alias = "api")]
    Remote,
}

impl FromStr for ServiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(ServiceMode::Local),
            "remote" | "api" => Ok(ServiceMode::Remote),
            other => Err(format!(
                "unknown mode '{}'; expected 'local' or 'remote'",
                other
            )),
        }
    }
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceMode::Local => write!(f, "local"),
            ServiceMode::Remote => write!(f, "remote"),
        }
    }
}

/// Local model configuration
#[derive(Debug, Clone)]
pub struct LocalModelConfig {
    /// Model name reported by /health
    pub model_name: String,
    /// Hub repository used when a path is missing
    pub repo: String,
    /// Path to the ONNX model file
    pub model_path: Option<PathBuf>,
    /// Path to the tokenizer JSON file
    pub tokenizer_path: Option<PathBuf>,
    /// Expected output dimension, checked at load time
    pub expected_dimensions: Option<usize>,
}

/// Remote inference API configuration
#[derive(Debug, Clone)]
pub struct RemoteApiConfig {
    pub endpoint: String,
    /// Bearer token; absent means unauthenticated (lower rate limit)
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

/// Top-level service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub mode: ServiceMode,
    pub host: String,
    pub port: u16,
    pub local: LocalModelConfig,
    pub remote: RemoteApiConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// An unrecognised `SIMILARITY_MODE` is an error rather than a fallback to local.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match non_empty("SIMILARITY_MODE") {
            Some(raw) => raw
                .parse::<ServiceMode>()
                .map_err(|e| anyhow!("Invalid SIMILARITY_MODE: {}", e))?,
            None => ServiceMode::Local,
        };

        Ok(Self::with_mode(mode, non_empty))
    }

    fn with_mode<F>(mode: ServiceMode, non_empty: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            mode,
            host: non_empty("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: non_empty("API_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            local: LocalModelConfig {
                model_name: non_empty("EMBEDDING_MODEL_NAME")
                    .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
                repo: non_empty("EMBEDDING_MODEL_REPO")
                    .unwrap_or_else(|| DEFAULT_MODEL_REPO.to_string()),
                model_path: non_empty("MODEL_PATH").map(PathBuf::from),
                tokenizer_path: non_empty("TOKENIZER_PATH").map(PathBuf::from),
                expected_dimensions: non_empty("EMBEDDING_DIMENSIONS")
                    .and_then(|v| v.parse().ok()),
            },
            remote: RemoteApiConfig {
                endpoint: non_empty("INFERENCE_API_URL")
                    .unwrap_or_else(|| DEFAULT_INFERENCE_API_URL.to_string()),
                api_token: non_empty("HF_TOKEN").or_else(|| non_empty("HF_API_TOKEN")),
                timeout_secs: non_empty("INFERENCE_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.remote.timeout_secs == 0 {
            return Err("Inference timeout must be greater than 0".to_string());
        }
        if self.remote.endpoint.trim().is_empty() {
            return Err("Inference API URL must not be empty".to_string());
        }
        if self.local.expected_dimensions == Some(0) {
            return Err("Embedding dimensions must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::with_mode(ServiceMode::Local, |_| None)
    }
}
