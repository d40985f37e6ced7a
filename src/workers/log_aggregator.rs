// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_event::{LogEvent, Severity};
use colored::Colorize;
use parking_lot::Mutex;
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// 日志输出目标
pub trait LogSink: Send + Sync {
    /// 输出一条日志事件
    fn emit(&self, event: &LogEvent);
}

/// 将日志事件渲染为 `[source] message`
///
/// 启用颜色时按级别为标签着色：SUCCESS 绿色，ERROR 红色，WARNING 黄色，其余默认
pub fn render(event: &LogEvent, colored: bool) -> String {
    let tag = format!("[{}]", event.source);
    if !colored {
        return format!("{} {}", tag, event.message);
    }

    let tag = match event.severity {
        Severity::Success => tag.green().to_string(),
        Severity::Error => tag.red().to_string(),
        Severity::Warning => tag.yellow().to_string(),
        Severity::Info => tag,
    };
    format!("{} {}", tag, event.message)
}

/// 终端输出，写入标准错误
#[derive(Debug, Clone)]
pub struct TerminalSink {
    colored: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            colored: std::io::stderr().is_terminal(),
        }
    }

    pub fn with_color(colored: bool) -> Self {
        Self { colored }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TerminalSink {
    fn emit(&self, event: &LogEvent) {
        eprintln!("{}", render(event, self.colored));
    }
}

/// 丢弃所有事件，静默模式使用
#[derive(Debug, Clone, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn emit(&self, _event: &LogEvent) {}
}

/// 在内存中记录事件
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|e| render(e, false))
            .collect()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, event: &LogEvent) {
        self.events.lock().push(event.clone());
    }
}

/// 日志聚合器
///
/// 单一消费者：把并发产生的日志事件按到达顺序串行输出
pub struct LogAggregator {
    sink: Arc<dyn LogSink>,
}

impl LogAggregator {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// 消费日志通道直至其关闭
    ///
    /// # 返回值
    ///
    /// 已输出的事件数量
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<LogEvent>) -> usize {
        let mut emitted = 0;
        while let Some(event) = rx.recv().await {
            self.sink.emit(&event);
            emitted += 1;
        }
        emitted
    }

    /// 在独立任务中运行聚合器
    ///
    /// 返回的句柄被丢弃时任务随之取消，尚未输出的事件不再输出
    pub fn spawn(self, rx: mpsc::UnboundedReceiver<LogEvent>) -> AggregatorTask {
        AggregatorTask {
            handle: tokio::spawn(self.run(rx)),
        }
    }
}

/// 正在运行的日志聚合任务
#[derive(Debug)]
pub struct AggregatorTask {
    handle: JoinHandle<usize>,
}

impl AggregatorTask {
    /// 等待日志通道关闭并全部输出
    pub async fn join(mut self) -> Result<usize, JoinError> {
        (&mut self.handle).await
    }
}

impl Drop for AggregatorTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
