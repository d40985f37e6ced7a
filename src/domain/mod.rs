// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：域名、日志事件
/// - 数据源（sources）：URL 数据源接口与数据源类型
/// - 服务（services）：全局去重结果累加器
pub mod models;
pub mod services;
pub mod sources;
