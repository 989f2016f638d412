// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;

use crate::config::{ServiceConfig, ServiceMode};

/// Answer similarity service
///
/// Flags take precedence over the matching environment variables.
#[derive(Parser, Debug, Default)]
#[command(name = "similarity-service")]
#[command(version)]
#[command(about = "Scores semantic similarity between two texts", long_about = None)]
pub struct Cli {
    /// Where embeddings come from
    #[arg(long, value_enum, ignore_case = true, env = "SIMILARITY_MODE")]
    pub mode: Option<ServiceMode>,

    /// Bind host
    #[arg(long, env = "API_HOST")]
    pub host: Option<String>,

    /// Bind port
    #[arg(long, env = "API_PORT")]
    pub port: Option<u16>,
}

impl Cli {
    /// Apply flags on top of an environment-derived configuration
    pub fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}
