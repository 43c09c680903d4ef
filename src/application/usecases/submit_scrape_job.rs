// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::ScrapeJob;
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::workers::job_orchestrator::JobOrchestrator;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// 用例错误
#[derive(Error, Debug)]
pub enum UseCaseError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Job not found: {0}")]
    NotFound(Uuid),

    #[error("Job {0} is not running")]
    NotRunning(Uuid),

    #[error("No results found for job {0}")]
    NoResults(Uuid),
}

/// 并发上限的默认值与允许的最大值
#[derive(Debug, Clone, Copy)]
pub struct ThreadLimits {
    pub default_max_threads: u32,
    pub max_threads_limit: u32,
}

impl Default for ThreadLimits {
    fn default() -> Self {
        Self {
            default_max_threads: 5,
            max_threads_limit: 25,
        }
    }
}

/// 提交抓取任务用例
///
/// 创建任务记录后立即返回，任务在后台异步运行。
/// 运行中的任务持有一个取消令牌，任务结束后移除
#[derive(Clone)]
pub struct SubmitScrapeJobUseCase {
    job_repository: Arc<dyn ScrapeJobRepository>,
    orchestrator: JobOrchestrator,
    limits: ThreadLimits,
    running: Arc<DashMap<Uuid, CancellationToken>>,
}

impl SubmitScrapeJobUseCase {
    pub fn new(
        job_repository: Arc<dyn ScrapeJobRepository>,
        orchestrator: JobOrchestrator,
        limits: ThreadLimits,
    ) -> Self {
        Self {
            job_repository,
            orchestrator,
            limits,
            running: Arc::new(DashMap::new()),
        }
    }

    /// 提交新任务
    ///
    /// # 参数
    ///
    /// * `urls` - 输入URL，空白项会被丢弃
    /// * `max_threads` - 并发上限，缺省时使用配置的默认值
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeJob)` - 已创建并开始运行的任务
    /// * `Err(UseCaseError)` - 参数无效或任务无法保存
    pub async fn submit(
        &self,
        urls: Vec<String>,
        max_threads: Option<u32>,
    ) -> Result<ScrapeJob, UseCaseError> {
        let urls: Vec<String> = urls
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        if urls.is_empty() {
            return Err(UseCaseError::Validation("No valid URLs provided".to_string()));
        }

        let max_threads = max_threads.unwrap_or(self.limits.default_max_threads);
        if !(1..=self.limits.max_threads_limit).contains(&max_threads) {
            return Err(UseCaseError::Validation(format!(
                "max_threads must be between 1 and {}",
                self.limits.max_threads_limit
            )));
        }

        let job = self
            .job_repository
            .create(&ScrapeJob::new(urls, max_threads))
            .await?;
        info!(job_id = %job.id, urls = job.total_urls, max_threads, "Scrape job submitted");

        let token = CancellationToken::new();
        self.running.insert(job.id, token.clone());

        let orchestrator = self.orchestrator.clone();
        let running = self.running.clone();
        let spawned = job.clone();
        tokio::spawn(async move {
            let job_id = spawned.id;
            if let Err(e) = orchestrator.run(spawned, token).await {
                warn!(job_id = %job_id, "Scrape job ended without completing: {}", e);
            }
            running.remove(&job_id);
        });

        Ok(job)
    }

    /// 取消运行中的任务
    pub async fn cancel(&self, job_id: Uuid) -> Result<(), UseCaseError> {
        if let Some(token) = self.running.get(&job_id) {
            info!(job_id = %job_id, "Cancelling scrape job");
            token.cancel();
            return Ok(());
        }

        match self.job_repository.find_by_id(job_id).await? {
            Some(_) => Err(UseCaseError::NotRunning(job_id)),
            None => Err(UseCaseError::NotFound(job_id)),
        }
    }

    pub fn is_running(&self, job_id: Uuid) -> bool {
        self.running.contains_key(&job_id)
    }

    /// 取消所有运行中的任务，返回被取消的任务数
    pub fn cancel_all(&self) -> usize {
        let mut cancelled = 0;
        for entry in self.running.iter() {
            entry.value().cancel();
            cancelled += 1;
        }
        if cancelled > 0 {
            info!(jobs = cancelled, "Cancelling all running scrape jobs");
        }
        cancelled
    }

    /// 等待所有任务结束，超时返回 `false`
    pub async fn wait_until_idle(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            while !self.running.is_empty() {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
        .await
        .is_ok()
    }
}

#[cfg(test)]
#[path = "submit_scrape_job_test.rs"]
mod tests;
