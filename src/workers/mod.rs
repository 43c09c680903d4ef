// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 包括抓取任务编排器和后台缓存清理工作器
pub mod cache_expiration_worker;
pub mod job_orchestrator;
pub mod worker;

pub use worker::Worker;
