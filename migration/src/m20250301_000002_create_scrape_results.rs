// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScrapeResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeResults::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeResults::JobId).uuid().not_null())
                    .col(ColumnDef::new(ScrapeResults::Url).text().not_null())
                    .col(ColumnDef::new(ScrapeResults::PhoneNumbers).json().not_null())
                    .col(
                        ColumnDef::new(ScrapeResults::EmailAddress)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScrapeResults::LinkedinUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScrapeResults::FacebookUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScrapeResults::InstagramUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScrapeResults::GithubUrl)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(ScrapeResults::Persons).json().not_null())
                    .col(
                        ColumnDef::new(ScrapeResults::CompanyAddress)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScrapeResults::ScrapedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScrapeResults::Method).string().null())
                    .col(ColumnDef::new(ScrapeResults::Success).boolean().not_null())
                    .col(ColumnDef::new(ScrapeResults::Error).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scrape_results_job_id")
                    .table(ScrapeResults::Table)
                    .col(ScrapeResults::JobId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapeResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapeResults {
    Table,
    Id,
    JobId,
    Url,
    PhoneNumbers,
    EmailAddress,
    LinkedinUrl,
    FacebookUrl,
    InstagramUrl,
    GithubUrl,
    Persons,
    CompanyAddress,
    ScrapedAt,
    Method,
    Success,
    Error,
}
