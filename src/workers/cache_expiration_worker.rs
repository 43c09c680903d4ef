// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::scrape_cache_repository::ScrapeCacheRepository;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// 缓存过期清理工作器
///
/// 定期删除已过期的缓存条目。读取时的过期判断仍然有效，
/// 这里只负责回收存储空间
pub struct CacheExpirationWorker {
    repository: Arc<dyn ScrapeCacheRepository>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CacheExpirationWorker {
    pub fn new(
        repository: Arc<dyn ScrapeCacheRepository>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            repository,
            interval,
            shutdown,
        }
    }

    /// 执行一次清理，返回删除的条目数
    pub async fn purge_once(&self) -> Result<u64, WorkerError> {
        let removed = self.repository.purge_expired(Utc::now()).await?;
        if removed > 0 {
            info!("Purged {} expired cache entries", removed);
        }
        Ok(removed)
    }
}

#[async_trait]
impl Worker for CacheExpirationWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!(interval_secs = self.interval.as_secs(), "Cache expiration worker started");

        let mut interval = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Cache expiration worker shutting down");
                    return Ok(());
                }
                _ = interval.tick() => {
                    if let Err(e) = self.purge_once().await {
                        error!("Failed to purge expired cache entries: {}", e);
                    }
                }
            }
        }
    }

    fn name(&self) -> &str {
        "cache_expiration_worker"
    }
}

#[cfg(test)]
#[path = "cache_expiration_worker_test.rs"]
mod tests;
