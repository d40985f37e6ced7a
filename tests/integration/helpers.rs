// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use phsh_url::domain::models::log_event::{LogEvent, LogSender};
use phsh_url::infrastructure::http::retrying_fetcher::RetryingFetcher;
use phsh_url::utils::retry_policy::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// 重试间隔缩短到毫秒级的抓取器
pub fn fast_fetcher() -> Arc<RetryingFetcher> {
    let policy = RetryPolicy::new(3, Duration::from_millis(10));
    Arc::new(RetryingFetcher::new(Duration::from_secs(5), policy).unwrap())
}

/// 收集日志事件的发送端
pub fn capture_logs() -> (LogSender, mpsc::UnboundedReceiver<LogEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (LogSender::new(tx), rx)
}

/// 发送端释放后取出全部已发送的事件
pub fn drain(log: LogSender, mut rx: mpsc::UnboundedReceiver<LogEvent>) -> Vec<LogEvent> {
    drop(log);
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
