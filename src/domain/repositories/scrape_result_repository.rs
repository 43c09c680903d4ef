// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 抓取结果仓库特质
#[async_trait]
pub trait ScrapeResultRepository: Send + Sync {
    /// 保存抓取结果
    async fn save(&self, result: &ScrapeResult) -> Result<(), RepositoryError>;
    /// 查找任务的全部结果
    async fn find_by_job_id(&self, job_id: Uuid) -> Result<Vec<ScrapeResult>, RepositoryError>;
}
