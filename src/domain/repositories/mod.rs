// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库模块
///
/// 定义任务、结果与缓存的数据访问接口
pub mod scrape_cache_repository;
pub mod scrape_job_repository;
pub mod scrape_result_repository;
