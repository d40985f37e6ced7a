// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::orchestrator::DomainOrchestrator;
use crate::domain::models::log_event::{LogEvent, Severity};
use crate::domain::models::target::{Domain, DomainRejection};
use crate::domain::services::accumulator::{ResultAccumulator, SharedAccumulator, Snapshot};
use crate::infrastructure::storage;
use crate::utils::errors::HarvestError;
use crate::utils::time_format::format_duration;
use crate::workers::log_aggregator::LogSink;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 默认输出文件
pub const DEFAULT_OUTPUT_FILE: &str = "endpoints.txt";
/// 失败域名文件
pub const FAILED_DOMAINS_FILE: &str = "failed_domains.txt";
/// 默认域名间隔
pub const DEFAULT_DOMAIN_DELAY: Duration = Duration::from_secs(20);

/// 输出文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub urls: PathBuf,
    pub failed_domains: PathBuf,
}

impl OutputPaths {
    pub fn new(urls: impl Into<PathBuf>) -> Self {
        Self {
            urls: urls.into(),
            failed_domains: PathBuf::from(FAILED_DOMAINS_FILE),
        }
    }

    pub fn with_failed_domains(mut self, path: impl Into<PathBuf>) -> Self {
        self.failed_domains = path.into();
        self
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_FILE)
    }
}

/// 运行结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 全部域名处理完成
    Completed,
    /// 被中断信号提前终止
    Interrupted,
}

/// 用户可见的进度输出；静默模式下不输出任何内容
#[derive(Clone)]
pub struct Reporter {
    sink: Arc<dyn LogSink>,
    silent: bool,
}

impl Reporter {
    pub fn new(sink: Arc<dyn LogSink>, silent: bool) -> Self {
        Self { sink, silent }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn report(&self, severity: Severity, message: impl Into<String>) {
        if !self.silent {
            self.sink.emit(&LogEvent::system(severity, message));
        }
    }
}

/// 清洗并验证输入行，跳过的行输出警告
pub fn prepare_domains<S: AsRef<str>>(lines: &[S], reporter: &Reporter) -> Vec<Domain> {
    let mut domains = Vec::with_capacity(lines.len());
    for line in lines {
        match Domain::parse(line.as_ref()) {
            Ok(domain) => domains.push(domain),
            Err(DomainRejection::Blank) => {
                reporter.report(Severity::Warning, "Skipping blank line.")
            }
            Err(rejection) => reporter.report(Severity::Warning, rejection.to_string()),
        }
    }
    domains
}

/// 剩余域名的预计等待时间，溢出时取最大值
fn remaining_wait(delay: Duration, remaining: usize) -> Duration {
    u32::try_from(remaining)
        .ok()
        .and_then(|count| delay.checked_mul(count))
        .unwrap_or(Duration::MAX)
}

/// 收集任务
///
/// 顺序处理域名：每个域名由编排器并发查询，结果在两次迭代之间合并进累加器，
/// 随后等待固定间隔以遵守数据源的速率限制
pub struct Harvester {
    orchestrator: DomainOrchestrator,
    accumulator: SharedAccumulator,
    reporter: Reporter,
    domain_delay: Duration,
}

impl Harvester {
    pub fn new(orchestrator: DomainOrchestrator, reporter: Reporter, domain_delay: Duration) -> Self {
        Self {
            orchestrator,
            accumulator: ResultAccumulator::shared(),
            reporter,
            domain_delay,
        }
    }

    pub fn accumulator(&self) -> SharedAccumulator {
        self.accumulator.clone()
    }

    /// 依次处理全部域名
    pub async fn run(&self, domains: &[Domain]) {
        let total = domains.len();

        // The position in the validated list doubles as the round-robin key index.
        for (key_index, domain) in domains.iter().enumerate() {
            let position = key_index + 1;
            let percentage = position as f64 / total as f64 * 100.0;
            self.reporter.report(
                Severity::Info,
                format!(
                    "Processing domain {}/{} ({:.2}%): {}",
                    position, total, percentage, domain
                ),
            );

            let report = self.orchestrator.dispatch(domain, key_index).await;
            let summary = report.merge_into(&mut self.accumulator.lock(), domain);
            debug!(
                "{}: {} URLs ({} new), failed sources {:?}",
                domain, summary.urls_found, summary.new_urls, summary.failed
            );

            if position < total {
                let remaining = remaining_wait(self.domain_delay, total - position);
                self.reporter.report(
                    Severity::Info,
                    format!(
                        "Waiting for {} before next domain. Estimated time remaining: {}",
                        format_duration(self.domain_delay),
                        format_duration(remaining)
                    ),
                );
                tokio::time::sleep(self.domain_delay).await;
            }
        }
    }

    /// 处理全部域名，直到完成或中断
    ///
    /// 中断时当前域名尚未完成的数据源任务被直接放弃，其结果不会合并
    pub async fn run_until<F>(&self, domains: &[Domain], interrupt: F) -> RunOutcome
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            _ = self.run(domains) => RunOutcome::Completed,
            _ = interrupt => RunOutcome::Interrupted,
        }
    }
}

async fn write_output(what: &'static str, path: &Path, lines: &[String]) -> Result<(), HarvestError> {
    storage::write_lines(path, lines)
        .await
        .map_err(|source| HarvestError::Output {
            what,
            path: path.to_path_buf(),
            source,
        })
}

async fn write_failed_domains(
    snapshot: &Snapshot,
    paths: &OutputPaths,
    reporter: &Reporter,
) -> Result<(), HarvestError> {
    if snapshot.failed_domains.is_empty() {
        return Ok(());
    }
    reporter.report(
        Severity::Warning,
        format!(
            "{} domains failed to process and were saved to {}",
            snapshot.failed_domains.len(),
            paths.failed_domains.display()
        ),
    );
    write_output("failed domains", &paths.failed_domains, &snapshot.failed_domains).await
}

/// 正常结束时持久化结果
///
/// 静默模式下 URL 逐行打印到 `stdout`，不写输出文件
pub async fn finish<W: Write>(
    snapshot: &Snapshot,
    paths: &OutputPaths,
    reporter: &Reporter,
    stdout: &mut W,
) -> Result<(), HarvestError> {
    write_failed_domains(snapshot, paths, reporter).await?;

    if reporter.is_silent() {
        for url in &snapshot.urls {
            writeln!(stdout, "{}", url).map_err(|source| HarvestError::Output {
                what: "URLs",
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        }
        return Ok(());
    }

    write_output("URLs", &paths.urls, &snapshot.urls).await?;
    reporter.report(
        Severity::Success,
        format!(
            "All done! Found {} unique URLs. Results saved to {}",
            snapshot.urls.len(),
            paths.urls.display()
        ),
    );
    Ok(())
}

/// 中断时持久化当前快照
///
/// 无论是否静默都写入输出文件
pub async fn flush_on_interrupt(
    snapshot: &Snapshot,
    paths: &OutputPaths,
    reporter: &Reporter,
) -> Result<(), HarvestError> {
    reporter.report(
        Severity::Warning,
        "Interrupt signal received. Saving results...",
    );
    write_output("URLs", &paths.urls, &snapshot.urls).await?;
    write_failed_domains(snapshot, paths, reporter).await?;
    reporter.report(
        Severity::Success,
        format!("Results saved to {}", paths.urls.display()),
    );
    Ok(())
}

#[cfg(test)]
#[path = "harvest_test.rs"]
mod tests;
