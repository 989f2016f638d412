// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX model tests for all-MiniLM-L6-v2
//!
//! These need the model files on disk and are ignored by default:
//! `cargo test -- --ignored`

use similarity_service::{cosine_similarity, round_score, OnnxEmbeddingModel, TextEmbedder};

const MODEL_PATH: &str = "./models/all-MiniLM-L6-v2-onnx/model.onnx";
const TOKENIZER_PATH: &str = "./models/all-MiniLM-L6-v2-onnx/tokenizer.json";

async fn load() -> OnnxEmbeddingModel {
    OnnxEmbeddingModel::new("all-MiniLM-L6-v2", MODEL_PATH, TOKENIZER_PATH, Some(384))
        .await
        .expect("Failed to load model")
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_model_loads_with_384_dimensions() {
    let model = load().await;
    assert_eq!(model.model_name(), "all-MiniLM-L6-v2");
    assert_eq!(model.dimension(), 384);
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_dimension_mismatch_fails_load() {
    let result =
        OnnxEmbeddingModel::new("all-MiniLM-L6-v2", MODEL_PATH, TOKENIZER_PATH, Some(768)).await;
    let message = format!("{}", result.unwrap_err());
    assert!(message.contains("dimension mismatch"), "{}", message);
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_embeddings_are_normalized() {
    let model = load().await;
    let embedding = model.embed("A linked list stores nodes with pointers").await.unwrap();
    let magnitude = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((magnitude - 1.0).abs() < 1e-3, "magnitude {}", magnitude);
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_identical_texts_score_one() {
    let model = load().await;
    let (a, b) = model
        .embed_pair("Dependency injection decouples construction", "Dependency injection decouples construction")
        .await
        .unwrap();
    assert_eq!(round_score(cosine_similarity(&a, &b)), 1.0);
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_related_answers_score_higher_than_unrelated() {
    let model = load().await;
    let ideal = "A hash map stores key-value pairs with average constant-time lookup";

    let (a, b) = model
        .embed_pair("Hash tables give O(1) lookups for keys", ideal)
        .await
        .unwrap();
    let (c, d) = model
        .embed_pair("The weather is sunny in Lisbon today", ideal)
        .await
        .unwrap();

    assert!(cosine_similarity(&a, &b) > cosine_similarity(&c, &d));
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_batch_matches_single() {
    let model = load().await;
    let single = model.embed("padding must not change the result").await.unwrap();
    let (batched, _) = model
        .embed_pair("padding must not change the result", "a much longer second sentence that forces padding of the first row")
        .await
        .unwrap();

    let max_diff = single
        .iter()
        .zip(batched.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max);
    assert!(max_diff < 1e-4, "max diff {}", max_diff);
}
