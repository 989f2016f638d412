// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Remote-mode endpoints against a fake inference API
//!
//! Upstream failures of any kind must come back as HTTP 200 with
//! `{"similarity": 0.0}` so the grading consumer falls back to keyword
//! scoring.

use axum::http::StatusCode;
use serde_json::json;
use similarity_service::api::{create_remote_app, RemoteState};
use similarity_service::RemoteEmbeddingClient;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::support::{fake_inference_api, get, post_json, spawn_app, TEST_TOKEN};

fn remote_app(upstream: SocketAddr, route: &str, token: Option<&str>, timeout_secs: u64) -> axum::Router {
    let client = RemoteEmbeddingClient::new(
        &format!("http://{}{}", upstream, route),
        token.map(str::to_string),
        timeout_secs,
    )
    .unwrap();
    create_remote_app(RemoteState::new(Arc::new(client)))
}

async fn similarity_via(route: &str, token: Option<&str>, text1: &str, text2: &str) -> (StatusCode, serde_json::Value) {
    let upstream = spawn_app(fake_inference_api()).await;
    post_json(
        remote_app(upstream, route, token, 1),
        "/similarity",
        json!({"text1": text1, "text2": text2}),
    )
    .await
}

#[tokio::test]
async fn test_health_is_static() {
    let upstream = spawn_app(fake_inference_api()).await;
    let (status, body) = get(remote_app(upstream, "/error", None, 1), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "ready": true, "mode": "remote-api"}));
}

#[tokio::test]
async fn test_single_vector_response() {
    let (status, body) = similarity_via("/single", None, "graph traversal", "graph traversal").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"similarity": 1.0}));
}

#[tokio::test]
async fn test_batch_response_uses_first_vector() {
    // the fake appends a constant second vector that would skew the score if used
    let (status, body) = similarity_via("/batch", None, "abc", "abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["similarity"], 1.0);
}

#[tokio::test]
async fn test_different_texts_score_below_one() {
    let (status, body) = similarity_via("/single", None, "aaaa", "bbbb").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["similarity"], 0.0);

    let (_, body) = similarity_via("/single", None, "ab", "a").await;
    assert_eq!(body["similarity"], 0.7071);
}

#[tokio::test]
async fn test_upstream_http_error_masks_to_zero() {
    let (status, body) = similarity_via("/error", None, "x", "y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"similarity": 0.0}));
}

#[tokio::test]
async fn test_malformed_upstream_body_masks_to_zero() {
    let (status, body) = similarity_via("/malformed", None, "x", "y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"similarity": 0.0}));
}

#[tokio::test]
async fn test_upstream_timeout_masks_to_zero() {
    // client timeout is 1s, the fake sleeps 3s
    let (status, body) = similarity_via("/slow", None, "x", "y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"similarity": 0.0}));
}

#[tokio::test]
async fn test_unreachable_upstream_masks_to_zero() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed = listener.local_addr().unwrap();
    drop(listener);

    let (status, body) = post_json(
        remote_app(closed, "/single", None, 1),
        "/similarity",
        json!({"text1": "x", "text2": "y"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"similarity": 0.0}));
}

#[tokio::test]
async fn test_zero_vectors_score_zero() {
    let (status, body) = similarity_via("/zero", None, "x", "y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["similarity"], 0.0);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (_, body) = similarity_via("/auth", Some(TEST_TOKEN), "token", "token").await;
    assert_eq!(body["similarity"], 1.0);

    let (status, body) = similarity_via("/auth", None, "token", "token").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["similarity"], 0.0);
}

#[tokio::test]
async fn test_empty_texts_are_not_validated() {
    let (status, body) = similarity_via("/single", None, "", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["similarity"], 0.0);
}
