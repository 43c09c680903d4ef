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
                    .table(ScrapeCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeCache::Url)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeCache::Data).json().not_null())
                    .col(
                        ColumnDef::new(ScrapeCache::LastScraped)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScrapeCache::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 过期清理按 expires_at 扫描
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scrape_cache_expires_at")
                    .table(ScrapeCache::Table)
                    .col(ScrapeCache::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapeCache::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapeCache {
    Table,
    Url,
    Data,
    LastScraped,
    ExpiresAt,
}
