// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 提供抓取结果缓存及其Redis后端
pub mod redis_cache_repo;
pub mod redis_client;
pub mod result_cache;
