// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统与外部世界交互的技术实现：
/// - HTTP（http）：带重试的抓取器
/// - 数据源（sources）：各情报数据源的客户端实现
/// - 存储（storage）：按行读写文件与标准输入
pub mod http;
pub mod sources;
pub mod storage;
