// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::ScrapeResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 任务提交响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStartedResponseDto {
    pub job_id: Uuid,
    /// 固定为 `started`
    pub status: String,
    pub message: String,
}

impl JobStartedResponseDto {
    pub fn new(job_id: Uuid, url_count: usize) -> Self {
        Self {
            job_id,
            status: "started".to_string(),
            message: format!("Scraping started for {} URL(s)", url_count),
        }
    }
}

/// 任务结果列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResultsResponseDto {
    pub results: Vec<ScrapeResult>,
    pub count: usize,
}

impl From<Vec<ScrapeResult>> for JobResultsResponseDto {
    fn from(results: Vec<ScrapeResult>) -> Self {
        let count = results.len();
        Self { results, count }
    }
}

/// 最近任务查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct ListJobsQuery {
    pub limit: Option<u64>,
}
