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
use serde_json::Value;
use std::sync::Arc;

pub const VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com";

/// VirusTotal v2 domain report; only the fields needed to extract URLs.
#[derive(Debug, Deserialize)]
pub struct VirusTotalReport {
    #[serde(default)]
    pub response_code: i64,
    /// Entries look like `[url, sha256, positives, total, scan_date]`.
    #[serde(default)]
    pub undetected_urls: Vec<Vec<Value>>,
}

impl VirusTotalReport {
    pub fn urls(&self) -> Vec<String> {
        if self.response_code != 1 {
            return Vec::new();
        }
        self.undetected_urls
            .iter()
            .filter_map(|entry| entry.first())
            .filter_map(|first| first.as_str())
            .map(str::to_string)
            .collect()
    }
}

/// VirusTotal 数据源
///
/// 必须配置 API 密钥，密钥以查询参数方式传递
pub struct VirusTotalSource {
    fetcher: Arc<RetryingFetcher>,
    keys: ApiKeys,
    base_url: String,
}

impl VirusTotalSource {
    pub fn new(fetcher: Arc<RetryingFetcher>, keys: ApiKeys) -> Self {
        Self {
            fetcher,
            keys,
            base_url: VIRUSTOTAL_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl UrlSource for VirusTotalSource {
    async fn fetch_urls(
        &self,
        domain: &Domain,
        key_index: usize,
        log: &LogSender,
    ) -> Result<Vec<String>, SourceError> {
        let api_key = self.keys.select(key_index).ok_or(SourceError::MissingApiKey)?;

        let url = endpoint(
            &self.base_url,
            "/vtapi/v2/domain/report",
            &[("apikey", api_key), ("domain", domain.as_str())],
        )?;
        let request = self
            .fetcher
            .client()
            .get(url)
            .build()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let response = self.fetcher.send(request, self.kind().tag(), log).await?;
        let body = read_body(response).await?;
        let report: VirusTotalReport = serde_json::from_str(&body)?;

        Ok(report.urls())
    }

    fn kind(&self) -> SourceKind {
        SourceKind::VirusTotal
    }
}
