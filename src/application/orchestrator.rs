// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_event::{LogEvent, LogSender, Severity};
use crate::domain::models::target::Domain;
use crate::domain::services::accumulator::ResultAccumulator;
use crate::domain::sources::source::{SourceKind, UrlSource};
use crate::workers::log_aggregator::{LogAggregator, LogSink};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// 单个数据源对某个域名的查询结果
///
/// `urls` 为 `None` 表示该数据源失败（结果缺失），与空列表不同
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub kind: SourceKind,
    pub urls: Option<Vec<String>>,
}

/// 一个域名全部数据源完成后的汇总，尚未合并进累加器
#[derive(Debug, Clone, Default)]
pub struct DomainReport {
    /// 实际调度的数据源数量
    pub dispatched: usize,
    /// 收到的结果（任务异常退出的数据源不会出现在这里）
    pub outcomes: Vec<SourceOutcome>,
    /// 日志聚合器输出的事件数量
    pub log_events: usize,
}

/// 合并后的域名处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSummary {
    pub dispatched: usize,
    pub succeeded: Vec<SourceKind>,
    pub failed: Vec<SourceKind>,
    pub urls_found: usize,
    pub new_urls: usize,
    pub marked_failed: bool,
}

impl DomainSummary {
    pub fn domain_success(&self) -> bool {
        !self.succeeded.is_empty()
    }
}

impl DomainReport {
    pub fn domain_success(&self) -> bool {
        self.outcomes.iter().any(|o| o.urls.is_some())
    }

    /// 将本域名的结果合并进累加器
    ///
    /// 至少调度了一个数据源且没有任何数据源返回结果时，域名记为失败
    pub fn merge_into(self, accumulator: &mut ResultAccumulator, domain: &Domain) -> DomainSummary {
        let domain_success = self.domain_success();
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        let mut urls_found = 0;
        let mut new_urls = 0;

        for outcome in self.outcomes {
            match outcome.urls {
                Some(urls) => {
                    succeeded.push(outcome.kind);
                    urls_found += urls.len();
                    new_urls += accumulator.merge(urls);
                }
                None => failed.push(outcome.kind),
            }
        }

        let marked_failed = self.dispatched > 0 && !domain_success;
        if marked_failed {
            accumulator.mark_failed(domain.clone());
        }
        accumulator.mark_processed();

        DomainSummary {
            dispatched: self.dispatched,
            succeeded,
            failed,
            urls_found,
            new_urls,
            marked_failed,
        }
    }
}

/// 单域名编排器
///
/// 对一个域名并发调度所有启用的数据源，等待全部完成，
/// 先排空日志通道，再读取结果通道
pub struct DomainOrchestrator {
    sources: Vec<Arc<dyn UrlSource>>,
    sink: Arc<dyn LogSink>,
    silent: bool,
}

impl DomainOrchestrator {
    pub fn new(sources: Vec<Arc<dyn UrlSource>>, sink: Arc<dyn LogSink>, silent: bool) -> Self {
        Self {
            sources,
            sink,
            silent,
        }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// 对一个域名调度全部启用的数据源
    ///
    /// # 参数
    ///
    /// * `domain` - 目标域名
    /// * `key_index` - API 密钥轮询序号
    ///
    /// # 返回值
    ///
    /// 所有数据源完成且日志全部输出后的汇总
    pub async fn dispatch(&self, domain: &Domain, key_index: usize) -> DomainReport {
        if self.sources.is_empty() {
            if !self.silent {
                self.sink.emit(&LogEvent::system(
                    Severity::Info,
                    format!("No sources selected for domain: {}", domain),
                ));
            }
            return DomainReport::default();
        }

        let dispatched = self.sources.len();
        let (result_tx, mut result_rx) = mpsc::channel::<SourceOutcome>(dispatched);
        let (log_tx, log_rx) = mpsc::unbounded_channel();
        let log = if self.silent {
            drop(log_tx);
            LogSender::disabled()
        } else {
            LogSender::new(log_tx)
        };
        let log_task = LogAggregator::new(self.sink.clone()).spawn(log_rx);

        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = source.clone();
            let domain = domain.clone();
            let log = log.clone();
            let result_tx = result_tx.clone();

            tasks.spawn(async move {
                let kind = source.kind();
                let urls = match source.fetch_urls(&domain, key_index, &log).await {
                    Ok(urls) => {
                        log.success(kind.tag(), format!("Found {} URLs", urls.len()));
                        Some(urls)
                    }
                    Err(e) => {
                        log.error(kind.tag(), e.to_string());
                        None
                    }
                };
                // Capacity equals the number of sources; this never waits.
                let _ = result_tx.send(SourceOutcome { kind, urls }).await;
            });
        }
        // Only the tasks hold senders now, so both channels close once they finish.
        drop(result_tx);
        drop(log);

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Source task for {} ended abnormally: {}", domain, e);
            }
        }

        let log_events = match log_task.join().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Log aggregator for {} ended abnormally: {}", domain, e);
                0
            }
        };

        let mut outcomes = Vec::with_capacity(dispatched);
        while let Some(outcome) = result_rx.recv().await {
            outcomes.push(outcome);
        }
        debug!(
            "{}: {} of {} sources reported",
            domain,
            outcomes.len(),
            dispatched
        );

        DomainReport {
            dispatched,
            outcomes,
            log_events,
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
