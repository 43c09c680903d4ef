// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的数据库与内存实现
pub mod memory_repo_impl;
pub mod scrape_cache_repo_impl;
pub mod scrape_job_repo_impl;
pub mod scrape_result_repo_impl;
