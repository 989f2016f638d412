// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the similarity service

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-embedding-similarity-2026-10-17";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-17";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "local-model",
    "remote-api",
    "cosine-similarity",
    "raw-embeddings",
    "hub-model-download",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Similarity Service {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Build tag and feature list, logged once at startup
pub fn get_build_info() -> String {
    format!("{} [{}]", VERSION, FEATURES.join(", "))
}
