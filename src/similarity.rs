// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Cosine similarity scoring
//!
//! Two flavours of the same formula are exposed because the two service
//! modes guard the denominator differently:
//! - [`cosine_similarity`] (local mode) returns 0.0 when the product of the
//!   magnitudes is exactly zero
//! - [`smoothed_cosine_similarity`] (remote mode) adds [`DENOMINATOR_EPSILON`]
//!   to the denominator
//!
//! Neither variant ever yields NaN or infinity. Vectors of different lengths
//! score 0.0.

/// Added to the denominator by [`smoothed_cosine_similarity`]
pub const DENOMINATOR_EPSILON: f64 = 1e-10;

/// Number of decimal digits kept in reported scores
pub const SCORE_DECIMALS: i32 = 4;

/// Cosine similarity with an exact-zero denominator guard
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let Some((dot, denom)) = dot_and_magnitudes(a, b) else {
        return 0.0;
    };
    if denom == 0.0 {
        return 0.0;
    }
    finite_or_zero(dot / denom)
}

/// Cosine similarity with [`DENOMINATOR_EPSILON`] added to the denominator
pub fn smoothed_cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let Some((dot, denom)) = dot_and_magnitudes(a, b) else {
        return 0.0;
    };
    finite_or_zero(dot / (denom + DENOMINATOR_EPSILON))
}

/// Rounds a score to [`SCORE_DECIMALS`] decimal digits
pub fn round_score(score: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (score * factor).round() / factor
}

/// Returns `(a·b, ‖a‖·‖b‖)` accumulated in f64, or `None` when the vectors
/// cannot be compared.
fn dot_and_magnitudes(a: &[f32], b: &[f32]) -> Option<(f64, f64)> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    Some((dot, norm_a.sqrt() * norm_b.sqrt()))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
