// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::progress_event::ProgressEvent;
use crate::domain::models::scrape_job::{JobProgress, JobStatus, ScrapeJob};
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::domain::services::extraction::ExtractionService;
use crate::domain::services::progress_broadcaster::ProgressBroadcaster;
use crate::engines::router::FetchRouter;
use crate::infrastructure::cache::result_cache::ResultCache;
use crate::utils::url_utils::normalize_url;
use chrono::Utc;
use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 取消时未开始的URL记录的错误信息
pub const CANCELLED_URL_ERROR: &str = "Job cancelled";

/// 任务级错误
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("cancelled")]
    Cancelled,
}

/// 任务计数器
///
/// 每个URL只结算一次，重复结算返回 `None`。结算时的通知在计数锁内发出，
/// 因此观察者看到的进度单调递增；存储写入由 `persisted` 串行化，
/// 较旧的快照不会覆盖较新的快照
struct ProgressTracker {
    state: Mutex<TrackerState>,
    persisted: tokio::sync::Mutex<u32>,
}

struct TrackerState {
    progress: JobProgress,
    settled: HashSet<usize>,
}

impl ProgressTracker {
    fn new(total: u32) -> Self {
        Self {
            state: Mutex::new(TrackerState {
                progress: JobProgress {
                    completed: 0,
                    failed: 0,
                    total,
                },
                settled: HashSet::new(),
            }),
            persisted: tokio::sync::Mutex::new(0),
        }
    }

    /// 结算一个URL，`notify` 在持有计数锁时以新的计数调用
    fn settle(
        &self,
        index: usize,
        success: bool,
        notify: impl FnOnce(JobProgress),
    ) -> Option<JobProgress> {
        let mut state = self.state.lock();
        if !state.settled.insert(index) {
            return None;
        }
        if success {
            state.progress.completed += 1;
        } else {
            state.progress.failed += 1;
        }
        let progress = state.progress;
        notify(progress);
        Some(progress)
    }

    fn snapshot(&self) -> JobProgress {
        self.state.lock().progress
    }
}

/// 抓取任务编排器
///
/// 为任务的每个URL启动一个tokio任务，由大小等于并发上限的信号量按提交顺序放行。
/// 单个URL的流程为：缓存查询 → 静态/动态获取 → 提取 → 写缓存 → 持久化 → 通知。
/// URL级别的错误和panic在工作任务边界被捕获并计为失败，
/// 只有任务自身的记账错误会让任务进入 `failed` 状态
#[derive(Clone)]
pub struct JobOrchestrator {
    job_repository: Arc<dyn ScrapeJobRepository>,
    result_repository: Arc<dyn ScrapeResultRepository>,
    cache: ResultCache,
    router: Arc<FetchRouter>,
    extractor: Arc<ExtractionService>,
    broadcaster: Arc<dyn ProgressBroadcaster>,
}

impl JobOrchestrator {
    pub fn new(
        job_repository: Arc<dyn ScrapeJobRepository>,
        result_repository: Arc<dyn ScrapeResultRepository>,
        cache: ResultCache,
        router: Arc<FetchRouter>,
        extractor: Arc<ExtractionService>,
        broadcaster: Arc<dyn ProgressBroadcaster>,
    ) -> Self {
        Self {
            job_repository,
            result_repository,
            cache,
            router,
            extractor,
            broadcaster,
        }
    }

    /// 运行任务直到所有URL结束
    ///
    /// # 返回值
    ///
    /// * `Ok(JobProgress)` - 任务完成时的最终计数
    /// * `Err(OrchestratorError)` - 任务被取消或记账失败，任务已标记为 `failed`
    #[instrument(skip(self, job, cancel), fields(job_id = %job.id, total = job.urls.len()))]
    pub async fn run(
        &self,
        job: ScrapeJob,
        cancel: CancellationToken,
    ) -> Result<JobProgress, OrchestratorError> {
        let job_id = job.id;
        match self.execute(job, &cancel).await {
            Ok(progress) => Ok(progress),
            Err(e) => {
                self.fail_job(job_id, &e).await;
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        job: ScrapeJob,
        cancel: &CancellationToken,
    ) -> Result<JobProgress, OrchestratorError> {
        let job_id = job.id;
        self.job_repository
            .update_status(job_id, JobStatus::InProgress, None, None)
            .await?;
        info!(max_threads = job.max_threads, "Job started");

        let tracker = Arc::new(ProgressTracker::new(job.urls.len() as u32));
        let semaphore = Arc::new(Semaphore::new(job.max_threads.max(1) as usize));
        let mut handles: Vec<(usize, String, JoinHandle<()>)> = Vec::with_capacity(job.urls.len());
        let mut next = 0;

        while next < job.urls.len() {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = semaphore.clone().acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                break;
            };

            let url = job.urls[next].clone();
            let worker = self.clone();
            let worker_tracker = tracker.clone();
            let worker_cancel = cancel.clone();
            let worker_url = url.clone();
            let index = next;
            let handle = tokio::spawn(async move {
                let _permit = permit;
                worker
                    .process_url(job_id, index, worker_url, worker_cancel, worker_tracker)
                    .await;
            });
            handles.push((index, url, handle));
            next += 1;
        }

        // 准入提前结束，剩余URL从未开始
        for (index, url) in job.urls.iter().enumerate().skip(next) {
            self.record_cancelled(job_id, index, url, &tracker).await;
        }

        for (index, url, handle) in handles {
            if let Err(e) = handle.await {
                error!(index, url = %url, "Worker task aborted: {}", e);
                self.record_worker_failure(job_id, index, &url, &e.to_string(), &tracker)
                    .await;
            }
        }

        let progress = tracker.snapshot();
        self.job_repository.update_progress(job_id, progress).await?;

        if cancel.is_cancelled() {
            return Err(OrchestratorError::Cancelled);
        }

        self.job_repository
            .update_status(job_id, JobStatus::Completed, None, Some(Utc::now()))
            .await?;
        self.broadcaster
            .publish(ProgressEvent::job_complete(job_id, progress));
        metrics::counter!("contactrs_jobs_total", "status" => "completed").increment(1);
        info!(
            completed = progress.completed,
            failed = progress.failed,
            "Job completed"
        );

        Ok(progress)
    }

    #[instrument(skip_all, fields(job_id = %job_id, url = %url, index = index))]
    async fn process_url(
        &self,
        job_id: Uuid,
        index: usize,
        url: String,
        cancel: CancellationToken,
        tracker: Arc<ProgressTracker>,
    ) {
        self.broadcaster
            .publish(ProgressEvent::url_start(job_id, &url, index));

        let outcome = AssertUnwindSafe(self.scrape_url(job_id, &url, &cancel))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("{}", message);
                let failed = ScrapeResult::failed(job_id, normalize_url(&url), &message);
                if let Err(e) = self.result_repository.save(&failed).await {
                    warn!("Failed to persist result after panic: {}", e);
                }
                self.record_worker_failure(job_id, index, &url, &message, &tracker)
                    .await;
                return;
            }
        };

        if let Err(e) = self.result_repository.save(&result).await {
            error!("Failed to persist result: {}", e);
            self.record_worker_failure(job_id, index, &url, &e.to_string(), &tracker)
                .await;
            return;
        }

        let outcome = if result.success { "success" } else { "failure" };
        metrics::counter!("contactrs_urls_total", "outcome" => outcome).increment(1);

        let settled = tracker.settle(index, result.success, |progress| {
            self.broadcaster
                .publish(ProgressEvent::url_complete(job_id, &url, index, &result));
            self.broadcaster
                .publish(ProgressEvent::progress_update(job_id, progress));
        });
        if let Some(progress) = settled {
            self.persist_progress(job_id, progress, &tracker).await;
        }
    }

    /// 单个URL的抓取流程，失败以 `success = false` 的结果表示
    async fn scrape_url(
        &self,
        job_id: Uuid,
        raw_url: &str,
        cancel: &CancellationToken,
    ) -> ScrapeResult {
        let url = normalize_url(raw_url);

        if let Some(cached) = self.cache.lookup(&url).await {
            debug!("Serving result from cache");
            return cached.restamp(job_id);
        }

        match self.router.fetch(&url, cancel).await {
            Ok(page) => {
                let contacts = self.extractor.extract(&page);
                let result = ScrapeResult::succeeded(job_id, &url, contacts, page.method);
                self.cache.store(&url, &result).await;
                result
            }
            Err(e) => {
                warn!("Scrape failed: {}", e);
                ScrapeResult::failed(job_id, &url, e.to_string())
            }
        }
    }

    async fn record_cancelled(
        &self,
        job_id: Uuid,
        index: usize,
        url: &str,
        tracker: &ProgressTracker,
    ) {
        let result = ScrapeResult::failed(job_id, normalize_url(url), CANCELLED_URL_ERROR);
        if let Err(e) = self.result_repository.save(&result).await {
            warn!(index, url, "Failed to persist cancelled result: {}", e);
        }
        metrics::counter!("contactrs_urls_total", "outcome" => "cancelled").increment(1);

        let settled = tracker.settle(index, false, |progress| {
            self.broadcaster
                .publish(ProgressEvent::url_complete(job_id, url, index, &result));
            self.broadcaster
                .publish(ProgressEvent::progress_update(job_id, progress));
        });
        if let Some(progress) = settled {
            self.persist_progress(job_id, progress, tracker).await;
        }
    }

    async fn record_worker_failure(
        &self,
        job_id: Uuid,
        index: usize,
        url: &str,
        message: &str,
        tracker: &ProgressTracker,
    ) {
        metrics::counter!("contactrs_urls_total", "outcome" => "error").increment(1);
        let settled = tracker.settle(index, false, |progress| {
            self.broadcaster
                .publish(ProgressEvent::url_error(job_id, url, index, message));
            self.broadcaster
                .publish(ProgressEvent::progress_update(job_id, progress));
        });
        if let Some(progress) = settled {
            self.persist_progress(job_id, progress, tracker).await;
        }
    }

    /// 写入进度快照，已写入更新的快照时跳过
    async fn persist_progress(
        &self,
        job_id: Uuid,
        progress: JobProgress,
        tracker: &ProgressTracker,
    ) {
        let mut persisted = tracker.persisted.lock().await;
        if progress.processed() <= *persisted {
            return;
        }
        match self.job_repository.update_progress(job_id, progress).await {
            Ok(()) => *persisted = progress.processed(),
            Err(e) => warn!(job_id = %job_id, "Failed to persist job progress: {}", e),
        }
    }

    async fn fail_job(&self, job_id: Uuid, err: &OrchestratorError) {
        let message = err.to_string();
        error!(job_id = %job_id, "Job failed: {}", message);

        if let Err(e) = self
            .job_repository
            .update_status(job_id, JobStatus::Failed, Some(message.clone()), Some(Utc::now()))
            .await
        {
            error!(job_id = %job_id, "Failed to mark job as failed: {}", e);
        }

        self.broadcaster
            .publish(ProgressEvent::job_error(job_id, message));
        metrics::counter!("contactrs_jobs_total", "status" => "failed").increment(1);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("Worker panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("Worker panicked: {}", s)
    } else {
        "Worker panicked".to_string()
    }
}

#[cfg(test)]
#[path = "job_orchestrator_test.rs"]
mod tests;
