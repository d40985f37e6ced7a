// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_event::LogSender;
use crate::domain::models::target::Domain;
use crate::domain::sources::source::{SourceError, SourceKind, UrlSource};
use crate::infrastructure::http::retrying_fetcher::RetryingFetcher;
use crate::infrastructure::sources::{endpoint, read_body};
use async_trait::async_trait;
use std::sync::Arc;

pub const WAYBACK_BASE_URL: &str = "https://web.archive.org";

/// 解析 CDX 纯文本响应：每行一个 URL，丢弃空行
pub fn parse_cdx_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Wayback Machine 数据源
///
/// 无需认证，请求 CDX 索引的纯文本输出
pub struct WaybackSource {
    fetcher: Arc<RetryingFetcher>,
    base_url: String,
}

impl WaybackSource {
    pub fn new(fetcher: Arc<RetryingFetcher>) -> Self {
        Self {
            fetcher,
            base_url: WAYBACK_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl UrlSource for WaybackSource {
    async fn fetch_urls(
        &self,
        domain: &Domain,
        _key_index: usize,
        log: &LogSender,
    ) -> Result<Vec<String>, SourceError> {
        let pattern = format!("*.{}/*", domain);
        let url = endpoint(
            &self.base_url,
            "/cdx/search/cdx",
            &[
                ("url", pattern.as_str()),
                ("output", "text"),
                ("fl", "original"),
                ("collapse", "urlkey"),
            ],
        )?;
        let request = self
            .fetcher
            .client()
            .get(url)
            .build()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let response = self.fetcher.send(request, self.kind().tag(), log).await?;
        let body = read_body(response).await?;

        Ok(parse_cdx_lines(&body))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Wayback
    }
}
