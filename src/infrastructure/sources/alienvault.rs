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
use tracing::debug;

pub const ALIENVAULT_BASE_URL: &str = "https://otx.alienvault.com";
/// 每页条目数
pub const PAGE_SIZE: u32 = 500;
/// 分页上限，防止服务端一直返回 has_next
pub const MAX_PAGES: u32 = 1000;

#[derive(Debug, Deserialize)]
pub struct UrlEntry {
    #[serde(default)]
    pub url: String,
}

/// One page of the OTX `url_list` endpoint.
#[derive(Debug, Deserialize)]
pub struct UrlListPage {
    #[serde(default)]
    pub url_list: Vec<UrlEntry>,
    #[serde(default)]
    pub has_next: bool,
}

/// AlienVault OTX 数据源
///
/// 分页查询，API 密钥可选（通过 `X-OTX-API-KEY` 请求头传递）
pub struct AlienVaultSource {
    fetcher: Arc<RetryingFetcher>,
    keys: ApiKeys,
    base_url: String,
}

impl AlienVaultSource {
    pub fn new(fetcher: Arc<RetryingFetcher>, keys: ApiKeys) -> Self {
        Self {
            fetcher,
            keys,
            base_url: ALIENVAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_page(
        &self,
        domain: &Domain,
        api_key: Option<&str>,
        page: u32,
        log: &LogSender,
    ) -> Result<UrlListPage, SourceError> {
        let path = format!("/api/v1/indicators/domain/{}/url_list", domain);
        let limit = PAGE_SIZE.to_string();
        let page_param = page.to_string();
        let url = endpoint(
            &self.base_url,
            &path,
            &[("limit", limit.as_str()), ("page", page_param.as_str())],
        )?;

        let mut builder = self.fetcher.client().get(url);
        if let Some(key) = api_key {
            builder = builder.header("X-OTX-API-KEY", key);
        }
        let request = builder
            .build()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let response = self.fetcher.send(request, self.kind().tag(), log).await?;
        let body = read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl UrlSource for AlienVaultSource {
    async fn fetch_urls(
        &self,
        domain: &Domain,
        key_index: usize,
        log: &LogSender,
    ) -> Result<Vec<String>, SourceError> {
        let api_key = self.keys.select(key_index);
        let mut urls = Vec::new();
        let mut page = 1;

        loop {
            let result = match self.fetch_page(domain, api_key, page, log).await {
                Ok(result) => result,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    // Later pages only shorten the list; what we have is still a result.
                    log.warning(
                        self.kind().tag(),
                        format!("Stopped at page {}: {}", page, e),
                    );
                    break;
                }
            };

            debug!(
                "OTX page {} for {} returned {} entries",
                page,
                domain,
                result.url_list.len()
            );
            urls.extend(result.url_list.into_iter().map(|entry| entry.url));

            if !result.has_next {
                break;
            }
            if page >= MAX_PAGES {
                log.warning(
                    self.kind().tag(),
                    format!("Reached the {} page limit, stopping pagination", MAX_PAGES),
                );
                break;
            }
            page += 1;
        }

        Ok(urls)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::AlienVault
    }
}
