// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::cache_entry::CacheEntry;
use crate::domain::repositories::scrape_cache_repository::ScrapeCacheRepository;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::infrastructure::cache::redis_client::RedisClient;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

const KEY_PREFIX: &str = "contactrs:cache:";

/// Redis结果缓存仓库
///
/// 条目以JSON保存，`SET EX` 的过期时间等于剩余保留期，
/// 因此过期清理由Redis完成
pub struct RedisScrapeCacheRepository {
    client: RedisClient,
}

impl RedisScrapeCacheRepository {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(url: &str) -> String {
        format!("{}{}", KEY_PREFIX, url)
    }
}

fn cache_err(e: anyhow::Error) -> RepositoryError {
    RepositoryError::Cache(e.to_string())
}

#[async_trait]
impl ScrapeCacheRepository for RedisScrapeCacheRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<CacheEntry>, RepositoryError> {
        let raw = self.client.get(&Self::key(url)).await.map_err(cache_err)?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), RepositoryError> {
        let ttl = (entry.expires_at - Utc::now()).num_seconds();
        if ttl <= 0 {
            // 已经过期，删除可能残留的旧条目
            self.client
                .del(&Self::key(&entry.url))
                .await
                .map_err(cache_err)?;
            return Ok(());
        }

        let payload = serde_json::to_string(entry)?;
        self.client
            .set(&Self::key(&entry.url), &payload, ttl as u64)
            .await
            .map_err(cache_err)
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        Ok(0)
    }
}
