// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::{ScrapeMethod, ScrapeResult, SocialProfiles};
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::infrastructure::database::entities::scrape_result as result_entity;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 抓取结果仓库实现
pub struct ScrapeResultRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ScrapeResultRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(m: result_entity::Model) -> Result<ScrapeResult, RepositoryError> {
    let method = match m.method {
        Some(raw) => Some(
            raw.parse::<ScrapeMethod>()
                .map_err(|e| RepositoryError::Database(DbErr::Custom(e.to_string())))?,
        ),
        None => None,
    };

    Ok(ScrapeResult {
        id: m.id,
        job_id: m.job_id,
        url: m.url,
        phone_numbers: serde_json::from_value(m.phone_numbers)?,
        email_address: m.email_address,
        social: SocialProfiles {
            linkedin_url: m.linkedin_url,
            facebook_url: m.facebook_url,
            instagram_url: m.instagram_url,
            github_url: m.github_url,
        },
        persons: serde_json::from_value(m.persons)?,
        company_address: m.company_address,
        scraped_at: m.scraped_at.into(),
        method,
        success: m.success,
        error: m.error,
    })
}

#[async_trait]
impl ScrapeResultRepository for ScrapeResultRepositoryImpl {
    async fn save(&self, result: &ScrapeResult) -> Result<(), RepositoryError> {
        let model = result_entity::ActiveModel {
            id: Set(result.id),
            job_id: Set(result.job_id),
            url: Set(result.url.clone()),
            phone_numbers: Set(serde_json::to_value(&result.phone_numbers)?),
            email_address: Set(result.email_address.clone()),
            linkedin_url: Set(result.social.linkedin_url.clone()),
            facebook_url: Set(result.social.facebook_url.clone()),
            instagram_url: Set(result.social.instagram_url.clone()),
            github_url: Set(result.social.github_url.clone()),
            persons: Set(serde_json::to_value(&result.persons)?),
            company_address: Set(result.company_address.clone()),
            scraped_at: Set(result.scraped_at.into()),
            method: Set(result.method.map(|m| m.as_str().to_string())),
            success: Set(result.success),
            error: Set(result.error.clone()),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    async fn find_by_job_id(&self, job_id: Uuid) -> Result<Vec<ScrapeResult>, RepositoryError> {
        result_entity::Entity::find()
            .filter(result_entity::Column::JobId.eq(job_id))
            .order_by_asc(result_entity::Column::ScrapedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }
}
