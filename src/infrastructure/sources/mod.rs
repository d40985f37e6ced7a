// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据源模块
///
/// 提供各个情报数据源的 HTTP 客户端实现
/// 包括 VirusTotal、AlienVault OTX、Wayback Machine 与 HudsonRock
/// 以及按排除列表构建数据源集合的工厂
pub mod alienvault;
pub mod factory;
pub mod hudsonrock;
pub mod virustotal;
pub mod wayback;

pub use alienvault::AlienVaultSource;
pub use factory::{parse_exclusions, SourceEndpoints, SourceFactory, SourceKeys};
pub use hudsonrock::HudsonRockSource;
pub use virustotal::VirusTotalSource;
pub use wayback::WaybackSource;

use crate::domain::sources::source::SourceError;
use reqwest::Response;
use url::Url;

/// Builds `base` + `path` with the given query pairs.
pub(crate) fn endpoint(base: &str, path: &str, query: &[(&str, &str)]) -> Result<Url, SourceError> {
    let mut url = Url::parse(base).map_err(|e| SourceError::Request(e.to_string()))?;
    url.set_path(path);
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

pub(crate) async fn read_body(response: Response) -> Result<String, SourceError> {
    response
        .text()
        .await
        .map_err(|e| SourceError::Body(e.to_string()))
}
