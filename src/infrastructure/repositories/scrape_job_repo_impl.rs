// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::{JobProgress, JobStatus, ScrapeJob};
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::infrastructure::database::entities::scrape_job as job_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{sea_query::Expr, *};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取任务仓库实现
pub struct ScrapeJobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScrapeJobRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(m: job_entity::Model) -> Result<ScrapeJob, RepositoryError> {
    let status = m
        .status
        .parse::<JobStatus>()
        .map_err(|e| RepositoryError::Database(DbErr::Custom(e.to_string())))?;
    let urls: Vec<String> = serde_json::from_value(m.urls)?;

    Ok(ScrapeJob {
        id: m.id,
        urls,
        max_threads: m.max_threads.max(0) as u32,
        status,
        total_urls: m.total_urls.max(0) as u32,
        completed_urls: m.completed_urls.max(0) as u32,
        failed_urls: m.failed_urls.max(0) as u32,
        progress: m.progress.clamp(0, 100) as u8,
        error: m.error,
        created_at: m.created_at.into(),
        completed_at: m.completed_at.map(Into::into),
    })
}

#[async_trait]
impl ScrapeJobRepository for ScrapeJobRepositoryImpl {
    async fn create(&self, job: &ScrapeJob) -> Result<ScrapeJob, RepositoryError> {
        let model = job_entity::ActiveModel {
            id: Set(job.id),
            urls: Set(serde_json::to_value(&job.urls)?),
            max_threads: Set(job.max_threads as i32),
            status: Set(job.status.to_string()),
            total_urls: Set(job.total_urls as i32),
            completed_urls: Set(job.completed_urls as i32),
            failed_urls: Set(job.failed_urls as i32),
            progress: Set(job.progress as i32),
            error: Set(job.error.clone()),
            created_at: Set(job.created_at.into()),
            completed_at: Set(job.completed_at.map(Into::into)),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError> {
        job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error: Option<String>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let completed_at: Option<DateTime<FixedOffset>> = completed_at.map(Into::into);
        let result = job_entity::Entity::update_many()
            .col_expr(job_entity::Column::Status, Expr::value(status.to_string()))
            .col_expr(job_entity::Column::Error, Expr::value(error))
            .col_expr(job_entity::Column::CompletedAt, Expr::value(completed_at))
            .filter(job_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn update_progress(
        &self,
        id: Uuid,
        progress: JobProgress,
    ) -> Result<(), RepositoryError> {
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::CompletedUrls,
                Expr::value(progress.completed as i32),
            )
            .col_expr(
                job_entity::Column::FailedUrls,
                Expr::value(progress.failed as i32),
            )
            .col_expr(
                job_entity::Column::Progress,
                Expr::value(progress.percent() as i32),
            )
            .filter(job_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_recent(&self, limit: u64) -> Result<Vec<ScrapeJob>, RepositoryError> {
        job_entity::Entity::find()
            .order_by_desc(job_entity::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }
}
