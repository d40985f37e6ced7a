// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据源领域模块
///
/// 定义 URL 数据源接口与数据源类型
pub mod source;
