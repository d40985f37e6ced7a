// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::target::Domain;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// 在驱动循环与中断处理之间共享的累加器
pub type SharedAccumulator = Arc<Mutex<ResultAccumulator>>;

/// 结果累加器
///
/// 全局去重 URL 集合（只增不减）以及全部数据源都失败的域名列表
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    urls: HashSet<String>,
    failed_domains: Vec<Domain>,
    domains_processed: usize,
}

/// 某一时刻累加器内容的扁平化副本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// 去重后的 URL，按字典序排列
    pub urls: Vec<String>,
    /// 失败域名，按失败顺序排列
    pub failed_domains: Vec<String>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedAccumulator {
        Arc::new(Mutex::new(Self::new()))
    }

    /// 合并一批 URL，已存在的 URL 不产生任何变化
    ///
    /// # 返回值
    ///
    /// 新加入集合的 URL 数量
    pub fn merge<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        urls.into_iter()
            .fold(0, |added, url| added + usize::from(self.urls.insert(url)))
    }

    pub fn mark_failed(&mut self, domain: Domain) {
        self.failed_domains.push(domain);
    }

    pub fn mark_processed(&mut self) {
        self.domains_processed += 1;
    }

    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn failed_domains(&self) -> &[Domain] {
        &self.failed_domains
    }

    /// Domains whose orchestration step has fully completed.
    pub fn domains_processed(&self) -> usize {
        self.domains_processed
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut urls: Vec<String> = self.urls.iter().cloned().collect();
        urls.sort_unstable();
        Snapshot {
            urls,
            failed_domains: self
                .failed_domains
                .iter()
                .map(|d| d.as_str().to_string())
                .collect(),
        }
    }
}
