// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 单域名编排器与顺序驱动循环
pub mod application;

/// 配置模块
///
/// 加载 API 密钥与扫描节奏配置
pub mod config;

/// 领域模块
///
/// 域名、日志事件、数据源接口与结果累加器
pub mod domain;

/// 基础设施模块
///
/// 带重试的 HTTP 抓取器、各数据源客户端与文件读写
pub mod infrastructure;

/// 表示层模块
///
/// 命令行参数
pub mod presentation;

/// 工具模块
pub mod utils;

/// 工作器模块
///
/// 日志聚合任务与中断监听任务
pub mod workers;
