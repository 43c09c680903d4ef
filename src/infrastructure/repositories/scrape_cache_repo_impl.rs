// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::cache_entry::CacheEntry;
use crate::domain::repositories::scrape_cache_repository::ScrapeCacheRepository;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::infrastructure::database::entities::scrape_cache as cache_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::sync::Arc;

/// 数据库结果缓存仓库
///
/// 每个规范化URL只保留一行，写入时覆盖旧数据
pub struct ScrapeCacheRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ScrapeCacheRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScrapeCacheRepository for ScrapeCacheRepositoryImpl {
    async fn find_by_url(&self, url: &str) -> Result<Option<CacheEntry>, RepositoryError> {
        let model = cache_entity::Entity::find_by_id(url.to_string())
            .one(self.db.as_ref())
            .await?;

        match model {
            Some(m) => Ok(Some(CacheEntry {
                url: m.url,
                result: serde_json::from_value(m.data)?,
                last_scraped: m.last_scraped.into(),
                expires_at: m.expires_at.into(),
            })),
            None => Ok(None),
        }
    }

    async fn upsert(&self, entry: &CacheEntry) -> Result<(), RepositoryError> {
        let model = cache_entity::ActiveModel {
            url: Set(entry.url.clone()),
            data: Set(serde_json::to_value(&entry.result)?),
            last_scraped: Set(entry.last_scraped.into()),
            expires_at: Set(entry.expires_at.into()),
        };

        cache_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::column(cache_entity::Column::Url)
                    .update_columns([
                        cache_entity::Column::Data,
                        cache_entity::Column::LastScraped,
                        cache_entity::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let now: DateTime<FixedOffset> = now.into();
        let result = cache_entity::Entity::delete_many()
            .filter(cache_entity::Column::ExpiresAt.lte(now))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }
}
