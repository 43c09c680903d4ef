// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层
///
/// 提供持久化、缓存、事件广播和指标导出的具体实现
pub mod broadcast;
pub mod cache;
pub mod database;
pub mod metrics;
pub mod repositories;
