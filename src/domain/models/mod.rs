// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 日志事件（log_event）：由数据源产生、由日志聚合器消费的事件
/// - 目标域名（target）：经过清洗与验证的域名
pub mod log_event;
pub mod target;
