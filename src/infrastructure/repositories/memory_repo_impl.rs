// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 基于 `DashMap` 的内存仓库
//!
//! 用于测试以及 `cache.backend = memory` 的部署，进程退出后数据丢失

use crate::domain::models::cache_entry::CacheEntry;
use crate::domain::models::scrape_job::{JobProgress, JobStatus, ScrapeJob};
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::repositories::scrape_cache_repository::ScrapeCacheRepository;
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// 内存任务仓库
#[derive(Default)]
pub struct InMemoryScrapeJobRepository {
    jobs: DashMap<Uuid, ScrapeJob>,
}

impl InMemoryScrapeJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScrapeJobRepository for InMemoryScrapeJobRepository {
    async fn create(&self, job: &ScrapeJob) -> Result<ScrapeJob, RepositoryError> {
        self.jobs.insert(job.id, job.clone());
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError> {
        Ok(self.jobs.get(&id).map(|job| job.clone()))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error: Option<String>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let mut job = self.jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        job.status = status;
        job.error = error;
        job.completed_at = completed_at;
        Ok(())
    }

    async fn update_progress(
        &self,
        id: Uuid,
        progress: JobProgress,
    ) -> Result<(), RepositoryError> {
        let mut job = self.jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        job.completed_urls = progress.completed;
        job.failed_urls = progress.failed;
        job.progress = progress.percent();
        Ok(())
    }

    async fn find_recent(&self, limit: u64) -> Result<Vec<ScrapeJob>, RepositoryError> {
        let mut jobs: Vec<ScrapeJob> = self.jobs.iter().map(|entry| entry.clone()).collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.truncate(limit as usize);
        Ok(jobs)
    }
}

/// 内存结果仓库，按任务ID分组并保持写入顺序
#[derive(Default)]
pub struct InMemoryScrapeResultRepository {
    results: DashMap<Uuid, Vec<ScrapeResult>>,
}

impl InMemoryScrapeResultRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScrapeResultRepository for InMemoryScrapeResultRepository {
    async fn save(&self, result: &ScrapeResult) -> Result<(), RepositoryError> {
        self.results
            .entry(result.job_id)
            .or_default()
            .push(result.clone());
        Ok(())
    }

    async fn find_by_job_id(&self, job_id: Uuid) -> Result<Vec<ScrapeResult>, RepositoryError> {
        Ok(self
            .results
            .get(&job_id)
            .map(|results| results.clone())
            .unwrap_or_default())
    }
}

/// 内存结果缓存
#[derive(Default)]
pub struct InMemoryScrapeCacheRepository {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryScrapeCacheRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ScrapeCacheRepository for InMemoryScrapeCacheRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<CacheEntry>, RepositoryError> {
        Ok(self.entries.get(url).map(|entry| entry.clone()))
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), RepositoryError> {
        self.entries.insert(entry.url.clone(), entry.clone());
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        Ok((before - self.entries.len()) as u64)
    }
}
