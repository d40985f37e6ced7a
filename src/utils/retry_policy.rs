// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use reqwest::StatusCode;
use std::time::Duration;

/// 默认最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// 默认重试间隔
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// 重试策略配置
///
/// 固定间隔、有限次数的重试
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（包含首次请求）
    pub max_attempts: u32,
    /// 两次尝试之间的固定等待时间
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// 单次响应的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 成功或重定向，直接返回
    Success,
    /// 服务端错误或限流，可重试
    Retryable,
    /// 客户端错误，不可重试
    ClientError,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// 第 `attempt` 次（从 1 开始）失败后是否还应继续尝试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// 根据 HTTP 状态码对响应分类
    ///
    /// 429 虽然属于 4xx，但表示暂时限流，按可重试处理
    pub fn classify(status: StatusCode) -> StatusClass {
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            StatusClass::Retryable
        } else if status.is_client_error() {
            StatusClass::ClientError
        } else {
            StatusClass::Success
        }
    }
}
