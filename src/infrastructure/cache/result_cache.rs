// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::cache_entry::CacheEntry;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::repositories::scrape_cache_repository::ScrapeCacheRepository;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// 抓取结果缓存
///
/// 以规范化URL为键的TTL缓存。只返回未过期的条目，
/// 存储层的任何错误都会记录日志并按未命中或跳过写入处理
#[derive(Clone)]
pub struct ResultCache {
    repository: Arc<dyn ScrapeCacheRepository>,
    retention: Duration,
}

impl ResultCache {
    /// 创建结果缓存
    ///
    /// # 参数
    ///
    /// * `repository` - 缓存存储后端
    /// * `retention` - 条目保留时长
    pub fn new(repository: Arc<dyn ScrapeCacheRepository>, retention: Duration) -> Self {
        Self {
            repository,
            retention,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// 查找未过期的缓存结果
    pub async fn lookup(&self, url: &str) -> Option<ScrapeResult> {
        match self.repository.find_by_url(url).await {
            Ok(Some(entry)) if entry.is_fresh(Utc::now()) => {
                debug!(url = %url, "Cache hit");
                metrics::counter!("contactrs_cache_lookups_total", "result" => "hit").increment(1);
                Some(entry.result)
            }
            Ok(_) => {
                metrics::counter!("contactrs_cache_lookups_total", "result" => "miss").increment(1);
                None
            }
            Err(e) => {
                warn!(url = %url, "Cache lookup failed, treating as miss: {}", e);
                metrics::counter!("contactrs_cache_lookups_total", "result" => "error")
                    .increment(1);
                None
            }
        }
    }

    /// 写入缓存，只保存成功的结果
    pub async fn store(&self, url: &str, result: &ScrapeResult) {
        if !result.success {
            return;
        }

        let entry = CacheEntry::new(url, result.clone(), Utc::now(), self.retention);
        if let Err(e) = self.repository.upsert(&entry).await {
            warn!(url = %url, "Failed to write cache entry: {}", e);
        }
    }
}
