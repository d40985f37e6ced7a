// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理 API 密钥与扫描参数的加载，以及首次运行时的默认配置文件
pub mod settings;
