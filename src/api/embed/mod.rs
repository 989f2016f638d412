// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed (local mode only)
//!
//! Returns the raw embedding of one text so callers can cache vectors
//! themselves instead of asking for a similarity each time.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::embed_handler;
pub use request::EmbedRequest;
pub use response::EmbedResponse;
