// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::sources::source::{ApiKeys, SourceKind, UrlSource};
use crate::infrastructure::http::retrying_fetcher::RetryingFetcher;
use crate::infrastructure::sources::alienvault::{AlienVaultSource, ALIENVAULT_BASE_URL};
use crate::infrastructure::sources::hudsonrock::{HudsonRockSource, HUDSONROCK_BASE_URL};
use crate::infrastructure::sources::virustotal::{VirusTotalSource, VIRUSTOTAL_BASE_URL};
use crate::infrastructure::sources::wayback::{WaybackSource, WAYBACK_BASE_URL};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// 各数据源的 API 密钥
#[derive(Debug, Clone, Default)]
pub struct SourceKeys {
    pub virustotal: ApiKeys,
    pub alienvault: ApiKeys,
    pub hudsonrock: ApiKeys,
}

/// 各数据源的基础地址
#[derive(Debug, Clone)]
pub struct SourceEndpoints {
    pub virustotal: String,
    pub alienvault: String,
    pub wayback: String,
    pub hudsonrock: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            virustotal: VIRUSTOTAL_BASE_URL.to_string(),
            alienvault: ALIENVAULT_BASE_URL.to_string(),
            wayback: WAYBACK_BASE_URL.to_string(),
            hudsonrock: HUDSONROCK_BASE_URL.to_string(),
        }
    }
}

impl SourceEndpoints {
    /// Every source pointed at the same base, as used against a mock server.
    pub fn all(base: &str) -> Self {
        Self {
            virustotal: base.to_string(),
            alienvault: base.to_string(),
            wayback: base.to_string(),
            hudsonrock: base.to_string(),
        }
    }
}

/// 解析逗号分隔的排除列表
///
/// # 返回值
///
/// 识别出的数据源集合，以及无法识别的名称（按出现顺序）
pub fn parse_exclusions(raw: &str) -> (BTreeSet<SourceKind>, Vec<String>) {
    let mut excluded = BTreeSet::new();
    let mut unknown = Vec::new();

    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match SourceKind::from_flag(name) {
            Some(kind) => {
                excluded.insert(kind);
            }
            None => unknown.push(name.to_string()),
        }
    }

    (excluded, unknown)
}

/// 数据源工厂
///
/// 根据密钥配置与排除列表创建启用的数据源，所有数据源共享同一个抓取器
pub struct SourceFactory {
    fetcher: Arc<RetryingFetcher>,
    keys: SourceKeys,
    endpoints: SourceEndpoints,
}

impl SourceFactory {
    pub fn new(fetcher: Arc<RetryingFetcher>, keys: SourceKeys) -> Self {
        Self {
            fetcher,
            keys,
            endpoints: SourceEndpoints::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: SourceEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// 创建单个数据源
    pub fn create(&self, kind: SourceKind) -> Arc<dyn UrlSource> {
        match kind {
            SourceKind::VirusTotal => Arc::new(
                VirusTotalSource::new(self.fetcher.clone(), self.keys.virustotal.clone())
                    .with_base_url(&self.endpoints.virustotal),
            ),
            SourceKind::AlienVault => Arc::new(
                AlienVaultSource::new(self.fetcher.clone(), self.keys.alienvault.clone())
                    .with_base_url(&self.endpoints.alienvault),
            ),
            SourceKind::Wayback => Arc::new(
                WaybackSource::new(self.fetcher.clone()).with_base_url(&self.endpoints.wayback),
            ),
            SourceKind::HudsonRock => Arc::new(
                HudsonRockSource::new(self.fetcher.clone(), self.keys.hudsonrock.clone())
                    .with_base_url(&self.endpoints.hudsonrock),
            ),
        }
    }

    /// 创建除排除列表外的全部数据源
    pub fn create_enabled(&self, excluded: &BTreeSet<SourceKind>) -> Vec<Arc<dyn UrlSource>> {
        let sources: Vec<Arc<dyn UrlSource>> = SourceKind::ALL
            .iter()
            .filter(|kind| !excluded.contains(kind))
            .map(|kind| self.create(*kind))
            .collect();

        info!(
            "Enabled sources: {:?}",
            sources.iter().map(|s| s.kind().tag()).collect::<Vec<_>>()
        );
        sources
    }
}
