// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

/// 致命错误类型
///
/// 出现任意一种都会终止整个运行并以非零状态退出
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("could not get user home directory")]
    HomeDirUnavailable,

    #[error("could not create default config file at {path}: {source}")]
    ConfigBootstrap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a new configuration file has been created at {0}. Please edit it to add your API keys")]
    ConfigCreated(PathBuf),

    #[error("could not load config file: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to read domains from {origin}: {source}")]
    DomainInput {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No domains provided for scanning.")]
    NoDomains,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to write {what} to {path}: {source}")]
    Output {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
