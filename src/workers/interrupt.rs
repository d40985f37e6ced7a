// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tokio::signal;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

/// 强制退出时的进程状态码
pub const FORCED_EXIT_CODE: i32 = 130;

/// 中断信号
///
/// 由中断监听任务触发；监听失败时永远不会触发
#[derive(Debug)]
pub struct InterruptSignal {
    rx: oneshot::Receiver<()>,
}

impl InterruptSignal {
    pub fn from_receiver(rx: oneshot::Receiver<()>) -> Self {
        Self { rx }
    }

    /// 等待中断发生
    pub async fn fired(self) {
        if self.rx.await.is_err() {
            // The watcher could not install its handler; never interrupt.
            std::future::pending::<()>().await;
        }
    }
}

/// 中断监听结束的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEnd {
    /// 信号源不可用，此后不会再有中断
    Unavailable,
    /// 第一次中断已无人等待，或收到了第二次中断；应立即退出
    ForceExit,
}

/// 监听中断信号
///
/// 第一次信号通知驱动循环保存结果；若驱动循环已不再等待（例如正在写出最终结果），
/// 或在保存期间再次收到信号，则返回 [`WatchEnd::ForceExit`]
///
/// # 参数
///
/// * `signals` - 每收到一次中断信号就产生一个值
/// * `tx` - 通知驱动循环的一次性通道
pub async fn watch(
    mut signals: mpsc::UnboundedReceiver<()>,
    tx: oneshot::Sender<()>,
) -> WatchEnd {
    if signals.recv().await.is_none() {
        return WatchEnd::Unavailable;
    }
    if tx.send(()).is_err() {
        return WatchEnd::ForceExit;
    }
    match signals.recv().await {
        Some(()) => WatchEnd::ForceExit,
        None => WatchEnd::Unavailable,
    }
}

/// 中断监听器
///
/// 整个进程只有一个，监听 Ctrl-C 并通知驱动循环
pub struct InterruptWatcher;

impl InterruptWatcher {
    /// 启动监听任务
    pub fn spawn() -> InterruptSignal {
        let (tx, rx) = oneshot::channel();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                match signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Interrupt signal received");
                        if signal_tx.send(()).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        error!("Unable to listen for interrupt signal: {}", err);
                        break;
                    }
                }
            }
        });

        tokio::spawn(async move {
            if watch(signal_rx, tx).await == WatchEnd::ForceExit {
                eprintln!("Interrupted again, exiting without waiting for results to be saved.");
                std::process::exit(FORCED_EXIT_CODE);
            }
        });

        InterruptSignal::from_receiver(rx)
    }
}
