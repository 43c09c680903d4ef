// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::cache_entry::CacheEntry;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 结果缓存仓库特质
///
/// 以规范化URL为键的存储，新鲜度由调用方判断
#[async_trait]
pub trait ScrapeCacheRepository: Send + Sync {
    /// 根据URL查找缓存条目（可能已过期）
    async fn find_by_url(&self, url: &str) -> Result<Option<CacheEntry>, RepositoryError>;
    /// 插入或覆盖缓存条目
    async fn upsert(&self, entry: &CacheEntry) -> Result<(), RepositoryError>;
    /// 删除 `expires_at <= now` 的条目，返回删除数量
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}
