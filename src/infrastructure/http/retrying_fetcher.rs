// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_event::LogSender;
use crate::utils::retry_policy::{RetryPolicy, StatusClass};
use crate::utils::time_format::format_duration;
use reqwest::{Client, Request, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// 默认请求超时时间
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 单次尝试失败的原因
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("server responded with {0}")]
    Status(StatusCode),
}

/// 抓取错误类型
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request rejected with client error {status}")]
    ClientError { status: StatusCode },

    #[error("request failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: AttemptFailure },

    #[error("request cannot be retried because its body is not cloneable")]
    NotCloneable,
}

/// 带重试的 HTTP 抓取器
///
/// 所有数据源共享同一个实例；传输错误、5xx 与 429 按固定间隔重试，
/// 其他 4xx 立即返回
#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    /// 创建抓取器
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求超时时间
    /// * `policy` - 重试策略
    ///
    /// # 返回值
    ///
    /// * `Ok(RetryingFetcher)` - 创建成功
    /// * `Err(reqwest::Error)` - HTTP 客户端构建失败
    pub fn new(timeout: Duration, policy: RetryPolicy) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("phsh-url/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self { client, policy })
    }

    pub fn with_client(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Client used by the sources to build their requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// 发送请求，必要时重试
    ///
    /// # 参数
    ///
    /// * `request` - 已构建的请求，每次尝试都会克隆
    /// * `source` - 日志中使用的数据源标签
    /// * `log` - 日志事件发送端
    ///
    /// # 返回值
    ///
    /// * `Ok(Response)` - 非错误状态的响应
    /// * `Err(FetchError)` - 客户端错误或重试次数耗尽
    pub async fn send(
        &self,
        request: Request,
        source: &str,
        log: &LogSender,
    ) -> Result<Response, FetchError> {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let current = request.try_clone().ok_or(FetchError::NotCloneable)?;
            debug!("[{}] attempt {}/{} GET {}", source, attempt, max_attempts, current.url());

            let failure = match self.client.execute(current).await {
                Ok(response) => match RetryPolicy::classify(response.status()) {
                    StatusClass::Success => return Ok(response),
                    StatusClass::ClientError => {
                        let status = response.status();
                        log.error(
                            source,
                            format!("Client error {}, not retrying.", status.as_u16()),
                        );
                        return Err(FetchError::ClientError { status });
                    }
                    StatusClass::Retryable => AttemptFailure::Status(response.status()),
                },
                Err(e) => AttemptFailure::Transport(e),
            };

            if !self.policy.should_retry(attempt) {
                log.warning(
                    source,
                    format!(
                        "Request failed (attempt {}/{}): {}",
                        attempt, max_attempts, failure
                    ),
                );
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt,
                    last: failure,
                });
            }

            log.warning(
                source,
                format!(
                    "Request failed (attempt {}/{}): {}. Retrying in {}...",
                    attempt,
                    max_attempts,
                    failure,
                    format_duration(self.policy.delay)
                ),
            );
            tokio::time::sleep(self.policy.delay).await;
        }
    }
}

#[cfg(test)]
#[path = "retrying_fetcher_test.rs"]
mod tests;
