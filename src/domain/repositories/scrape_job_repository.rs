// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::{JobProgress, JobStatus, ScrapeJob};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 缓存后端错误
    #[error("Cache error: {0}")]
    Cache(String),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 抓取任务仓库特质
///
/// 定义任务数据访问接口
#[async_trait]
pub trait ScrapeJobRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, job: &ScrapeJob) -> Result<ScrapeJob, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError>;
    /// 更新任务状态，终态时同时写入错误信息和完成时间
    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error: Option<String>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError>;
    /// 更新计数器与进度百分比
    async fn update_progress(&self, id: Uuid, progress: JobProgress)
        -> Result<(), RepositoryError>;
    /// 按创建时间倒序返回最近的任务
    async fn find_recent(&self, limit: u64) -> Result<Vec<ScrapeJob>, RepositoryError>;
}
