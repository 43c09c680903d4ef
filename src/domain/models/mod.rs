// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义抓取任务、抓取结果、缓存条目与进度事件
pub mod cache_entry;
pub mod progress_event;
pub mod scrape_job;
pub mod scrape_result;
