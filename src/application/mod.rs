// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含单域名编排器以及驱动整个收集过程的用例
pub mod orchestrator;
pub mod use_cases;
