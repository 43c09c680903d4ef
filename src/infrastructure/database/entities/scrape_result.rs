// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scrape_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub phone_numbers: Json,
    pub email_address: String,
    #[sea_orm(column_type = "Text")]
    pub linkedin_url: String,
    #[sea_orm(column_type = "Text")]
    pub facebook_url: String,
    #[sea_orm(column_type = "Text")]
    pub instagram_url: String,
    #[sea_orm(column_type = "Text")]
    pub github_url: String,
    pub persons: Json,
    #[sea_orm(column_type = "Text")]
    pub company_address: String,
    pub scraped_at: ChronoDateTimeWithTimeZone,
    pub method: Option<String>,
    pub success: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scrape_job::Entity",
        from = "Column::JobId",
        to = "super::scrape_job::Column::Id"
    )]
    ScrapeJob,
}

impl Related<super::scrape_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScrapeJob.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
