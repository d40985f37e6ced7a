// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供每个域名的日志聚合任务与进程级中断监听任务
pub mod interrupt;
pub mod log_aggregator;
