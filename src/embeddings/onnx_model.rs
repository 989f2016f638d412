// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs the all-MiniLM-L6-v2 sentence transformer with ONNX Runtime.
//!
//! Pipeline per text:
//! - BERT tokenization (truncated to 256 tokens, padded per batch)
//! - ONNX inference producing token embeddings `[batch, seq_len, hidden]`
//! - Mean pooling weighted by the attention mask
//! - L2 normalization, matching the sentence-transformers `Normalize` layer

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, ArrayView2, ArrayView3, Axis, Ix3};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::TextEmbedder;

/// Maximum sequence length of all-MiniLM-L6-v2
pub const MAX_SEQUENCE_LENGTH: usize = 256;

const VALIDATION_TEXT: &str = "validation test";

/// ONNX-based embedding model
///
/// Cloning is cheap: the session and tokenizer are shared through `Arc`.
/// The session needs exclusive access to run, so concurrent inferences
/// serialize on its mutex.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

/// Tokenized, padded batch ready for inference
struct EncodedBatch {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
    token_type_ids: Array2<i64>,
}

impl OnnxEmbeddingModel {
    /// Loads the model on the blocking thread pool
    ///
    /// See [`OnnxEmbeddingModel::load`] for the checks performed.
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        expected_dimension: Option<usize>,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path: PathBuf = model_path.as_ref().to_path_buf();
        let tokenizer_path: PathBuf = tokenizer_path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || {
            Self::load(model_name, &model_path, &tokenizer_path, expected_dimension)
        })
        .await
        .context("Model loading task failed")?
    }

    /// Loads the ONNX session and tokenizer from disk
    ///
    /// A validation inference discovers the output dimension. Loading fails
    /// if either file is missing, the output is not `[batch, seq_len, hidden]`,
    /// or `expected_dimension` is set and does not match.
    pub fn load(
        model_name: impl Into<String>,
        model_path: &Path,
        tokenizer_path: &Path,
        expected_dimension: Option<usize>,
    ) -> Result<Self> {
        let model_name = model_name.into();

        if !model_path.exists() {
            bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Initializing ONNX session from {}", model_path.display());
        let mut session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;
        // Padding is applied per batch in encode_batch
        tokenizer.with_padding(None);

        let probe = encode_batch(&tokenizer, &[VALIDATION_TEXT])?;
        let dimension = run_session(&mut session, probe)?
            .first()
            .map(Vec::len)
            .context("Validation inference returned no embeddings")?;

        if let Some(expected) = expected_dimension {
            if expected != dimension {
                bail!(
                    "Model {} dimension mismatch: expected {}, got {}",
                    model_name,
                    expected,
                    dimension
                );
            }
        }

        info!("ONNX embedding model {} loaded ({} dimensions)", model_name, dimension);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
        })
    }

    /// Embeds texts in one inference call (blocking)
    pub fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch = encode_batch(&self.tokenizer, texts)?;
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("ONNX session lock poisoned"))?;
        let embeddings = run_session(&mut session, batch)?;

        for (i, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != self.dimension {
                bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    i,
                    embedding.len(),
                    self.dimension
                );
            }
        }

        debug!("Encoded {} texts with {}", texts.len(), self.model_name);
        Ok(embeddings)
    }

    /// Returns the output dimension of this model
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    async fn encode_owned(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = self.clone();
        tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            model.encode(&refs)
        })
        .await
        .context("Inference task failed")?
    }
}

#[async_trait]
impl TextEmbedder for OnnxEmbeddingModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_owned(vec![text.to_string()])
            .await?
            .pop()
            .context("Inference returned no embedding")
    }

    async fn embed_pair(&self, first: &str, second: &str) -> Result<(Vec<f32>, Vec<f32>)> {
        let mut embeddings = self
            .encode_owned(vec![first.to_string(), second.to_string()])
            .await?
            .into_iter();
        match (embeddings.next(), embeddings.next()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => bail!("Inference returned fewer than two embeddings"),
        }
    }
}

/// Tokenizes texts and pads every row to the longest sequence
fn encode_batch(tokenizer: &Tokenizer, texts: &[&str]) -> Result<EncodedBatch> {
    let encodings = texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(*text, true)
                .map_err(|e| anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);

    let rows = texts.len();
    let mut input_ids = Array2::<i64>::zeros((rows, max_len));
    let mut attention_mask = Array2::<i64>::zeros((rows, max_len));

    for (row, encoding) in encodings.iter().enumerate() {
        let ids = encoding.get_ids();
        let mask = encoding.get_attention_mask();
        for (col, (&id, &m)) in ids.iter().zip(mask.iter()).enumerate() {
            input_ids[[row, col]] = id as i64;
            attention_mask[[row, col]] = m as i64;
        }
    }

    Ok(EncodedBatch {
        input_ids,
        attention_mask,
        token_type_ids: Array2::<i64>::zeros((rows, max_len)),
    })
}

/// Runs inference and pools token embeddings into sentence embeddings
fn run_session(session: &mut Session, batch: EncodedBatch) -> Result<Vec<Vec<f32>>> {
    let mask = batch.attention_mask.clone();

    let outputs = session.run(ort::inputs![
        "input_ids" => Value::from_array(batch.input_ids)?,
        "attention_mask" => Value::from_array(batch.attention_mask)?,
        "token_type_ids" => Value::from_array(batch.token_type_ids)?
    ])?;

    // Output names differ between exports; the token embeddings come first
    let hidden = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;
    let hidden = hidden
        .into_dimensionality::<Ix3>()
        .context("Model output is not [batch, seq_len, hidden]")?;

    mean_pool(hidden, mask.view())
}

/// Attention-masked mean pooling followed by L2 normalization
fn mean_pool(hidden: ArrayView3<f32>, mask: ArrayView2<i64>) -> Result<Vec<Vec<f32>>> {
    if hidden.len_of(Axis(0)) != mask.len_of(Axis(0)) {
        bail!(
            "Batch size mismatch between output ({}) and attention mask ({})",
            hidden.len_of(Axis(0)),
            mask.len_of(Axis(0))
        );
    }

    let hidden_dim = hidden.len_of(Axis(2));
    let mut pooled = Vec::with_capacity(hidden.len_of(Axis(0)));

    for (item, item_mask) in hidden.outer_iter().zip(mask.outer_iter()) {
        let mut sum = vec![0.0f32; hidden_dim];
        let mut tokens = 0.0f32;

        for (token, &m) in item.outer_iter().zip(item_mask.iter()) {
            if m == 0 {
                continue;
            }
            tokens += 1.0;
            for (acc, value) in sum.iter_mut().zip(token.iter()) {
                *acc += *value;
            }
        }

        let denom = tokens.max(1e-9);
        sum.iter_mut().for_each(|v| *v /= denom);
        pooled.push(l2_normalize(sum));
    }

    Ok(pooled)
}

fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-12 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}
