// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_event::LogSender;
use crate::domain::models::target::Domain;
use crate::domain::sources::source::{ApiKeys, SourceError, SourceKind, UrlSource};
use crate::infrastructure::http::retrying_fetcher::RetryingFetcher;
use crate::infrastructure::sources::{endpoint, read_body};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

pub const HUDSONROCK_BASE_URL: &str = "https://cavalier.hudsonrock.com";

#[derive(Debug, Deserialize)]
pub struct HudsonRockUrl {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HudsonRockData {
    #[serde(default)]
    pub all_urls: Vec<HudsonRockUrl>,
}

/// Response of the `search-by-domain` OSINT endpoint.
#[derive(Debug, Deserialize)]
pub struct HudsonRockResponse {
    #[serde(default)]
    pub data: HudsonRockData,
}

impl HudsonRockResponse {
    pub fn urls(self) -> Vec<String> {
        self.data.all_urls.into_iter().map(|entry| entry.url).collect()
    }
}

/// HudsonRock 数据源
///
/// API 密钥可选（通过 `key` 请求头传递），未配置时结果可能被脱敏
pub struct HudsonRockSource {
    fetcher: Arc<RetryingFetcher>,
    keys: ApiKeys,
    base_url: String,
}

impl HudsonRockSource {
    pub fn new(fetcher: Arc<RetryingFetcher>, keys: ApiKeys) -> Self {
        Self {
            fetcher,
            keys,
            base_url: HUDSONROCK_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl UrlSource for HudsonRockSource {
    async fn fetch_urls(
        &self,
        domain: &Domain,
        key_index: usize,
        log: &LogSender,
    ) -> Result<Vec<String>, SourceError> {
        let url = endpoint(
            &self.base_url,
            "/api/json/v2/osint-tools/search-by-domain",
            &[("domain", domain.as_str())],
        )?;

        let mut builder = self.fetcher.client().get(url);
        match self.keys.select(key_index) {
            Some(key) => builder = builder.header("key", key),
            None => log.warning(
                self.kind().tag(),
                "Processing without API key (data may be redacted)...",
            ),
        }
        let request = builder
            .build()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let response = self.fetcher.send(request, self.kind().tag(), log).await?;
        let body = read_body(response).await?;
        let parsed: HudsonRockResponse = serde_json::from_str(&body)?;

        Ok(parsed.urls())
    }

    fn kind(&self) -> SourceKind {
        SourceKind::HudsonRock
    }
}
