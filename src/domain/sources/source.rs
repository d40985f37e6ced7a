// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_event::LogSender;
use crate::domain::models::target::Domain;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// 数据源类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// VirusTotal 域名报告
    VirusTotal,
    /// AlienVault OTX 分页 URL 列表
    AlienVault,
    /// Wayback Machine CDX 索引
    Wayback,
    /// HudsonRock 域名搜索
    HudsonRock,
}

impl SourceKind {
    /// 全部数据源，按调度顺序排列
    pub const ALL: [SourceKind; 4] = [
        Self::VirusTotal,
        Self::AlienVault,
        Self::Wayback,
        Self::HudsonRock,
    ];

    /// 日志中使用的标签
    pub fn tag(&self) -> &'static str {
        match self {
            Self::VirusTotal => "VT",
            Self::AlienVault => "OTX",
            Self::Wayback => "Wayback",
            Self::HudsonRock => "HudsonRock",
        }
    }

    /// 命令行排除列表中使用的名称
    pub fn flag_name(&self) -> &'static str {
        match self {
            Self::VirusTotal => "vt",
            Self::AlienVault => "otx",
            Self::Wayback => "wayback",
            Self::HudsonRock => "hr",
        }
    }

    /// 从排除列表名称解析数据源类型
    pub fn from_flag(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "vt" => Some(Self::VirusTotal),
            "otx" => Some(Self::AlienVault),
            "wayback" => Some(Self::Wayback),
            "hr" => Some(Self::HudsonRock),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 某个数据源的 API 密钥集合
///
/// 进程生命周期内不可变，按域名序号轮询选择
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeys(Vec<String>);

impl ApiKeys {
    pub fn new(keys: Vec<String>) -> Self {
        Self(keys)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 按轮询序号选择密钥
    ///
    /// # 参数
    ///
    /// * `key_index` - 域名轮询序号
    ///
    /// # 返回值
    ///
    /// 密钥列表为空时返回 `None`，否则返回 `keys[key_index % len]`
    pub fn select(&self, key_index: usize) -> Option<&str> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0[key_index % self.0.len()].as_str())
    }
}

impl From<Vec<String>> for ApiKeys {
    fn from(keys: Vec<String>) -> Self {
        Self::new(keys)
    }
}

/// 数据源查询错误
///
/// 任意一种错误都表示该数据源对该域名的结果“缺失”，与空结果不同
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No API key configured, skipping")]
    MissingApiKey,

    #[error("Failed to create request: {0}")]
    Request(String),

    #[error(transparent)]
    Fetch(#[from] crate::infrastructure::http::retrying_fetcher::FetchError),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// URL 数据源接口
///
/// 每个实现把一个域名（以及可选的 API 密钥）转换为发现的 URL 列表
#[async_trait]
pub trait UrlSource: Send + Sync {
    /// Query the source for every known URL under `domain`.
    ///
    /// `Ok` with an empty list is a successful, empty outcome; `Err` marks the
    /// source as failed for this domain.
    async fn fetch_urls(
        &self,
        domain: &Domain,
        key_index: usize,
        log: &LogSender,
    ) -> Result<Vec<String>, SourceError>;

    /// Get the kind of this source
    fn kind(&self) -> SourceKind;
}
