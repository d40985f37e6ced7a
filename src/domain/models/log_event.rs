// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use tokio::sync::mpsc;

/// 日志事件严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// 普通信息
    Info,
    /// 成功
    Success,
    /// 警告
    Warning,
    /// 错误
    Error,
}

impl Severity {
    /// 获取级别名称
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 日志事件
///
/// 由数据源查询器或重试抓取器产生，由日志聚合器恰好消费一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub severity: Severity,
    pub source: String,
    pub message: String,
}

impl LogEvent {
    pub fn new(severity: Severity, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            source: source.into(),
            message: message.into(),
        }
    }

    /// Event emitted by the driver itself rather than a source; tagged with its severity.
    pub fn system(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(severity, severity.label(), message)
    }
}

/// 日志事件发送端
///
/// 静默模式下发送端为空，事件在产生处即被丢弃（不缓冲、不延迟）
#[derive(Debug, Clone)]
pub struct LogSender {
    tx: Option<mpsc::UnboundedSender<LogEvent>>,
}

impl LogSender {
    pub fn new(tx: mpsc::UnboundedSender<LogEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sender that drops every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub fn send(&self, event: LogEvent) {
        if let Some(tx) = &self.tx {
            // The receiver only goes away once the domain has been drained.
            let _ = tx.send(event);
        }
    }

    pub fn info(&self, source: &str, message: impl Into<String>) {
        self.send(LogEvent::new(Severity::Info, source, message));
    }

    pub fn success(&self, source: &str, message: impl Into<String>) {
        self.send(LogEvent::new(Severity::Success, source, message));
    }

    pub fn warning(&self, source: &str, message: impl Into<String>) {
        self.send(LogEvent::new(Severity::Warning, source, message));
    }

    pub fn error(&self, source: &str, message: impl Into<String>) {
        self.send(LogEvent::new(Severity::Error, source, message));
    }
}
