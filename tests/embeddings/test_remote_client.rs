// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! RemoteEmbeddingClient error classification against a fake inference API

use similarity_service::embeddings::{EmbeddingError, RemoteEmbeddingClient};
use similarity_service::TextEmbedder;

use crate::support::{fake_inference_api, letter_vector, spawn_app, TEST_TOKEN};

async fn client(route: &str, token: Option<&str>) -> RemoteEmbeddingClient {
    let upstream = spawn_app(fake_inference_api()).await;
    RemoteEmbeddingClient::new(
        &format!("http://{}{}", upstream, route),
        token.map(str::to_string),
        1,
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_single_vector() {
    let vector = client("/single", None).await.fetch_embedding("hello").await.unwrap();
    assert_eq!(vector, letter_vector("hello"));
}

#[tokio::test]
async fn test_fetch_batch_vector() {
    let vector = client("/batch", None).await.fetch_embedding("hello").await.unwrap();
    assert_eq!(vector, letter_vector("hello"));
}

#[tokio::test]
async fn test_status_error() {
    let err = client("/error", None).await.fetch_embedding("x").await.unwrap_err();
    match err {
        EmbeddingError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_token_is_status_error() {
    let err = client("/auth", None).await.fetch_embedding("x").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::Status { status: 401, .. }));

    let vector = client("/auth", Some(TEST_TOKEN))
        .await
        .fetch_embedding("x")
        .await
        .unwrap();
    assert_eq!(vector, letter_vector("x"));
}

#[tokio::test]
async fn test_malformed_body() {
    let err = client("/malformed", None).await.fetch_embedding("x").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_timeout() {
    let err = client("/slow", None).await.fetch_embedding("x").await.unwrap_err();
    assert!(
        matches!(err, EmbeddingError::Timeout { timeout_secs: 1 }),
        "{:?}",
        err
    );
}

#[tokio::test]
async fn test_embed_pair_makes_two_calls() {
    let (a, b) = client("/single", None)
        .await
        .embed_pair("left", "right")
        .await
        .unwrap();
    assert_eq!(a, letter_vector("left"));
    assert_eq!(b, letter_vector("right"));
}
