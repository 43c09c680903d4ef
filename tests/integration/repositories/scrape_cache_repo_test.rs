// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use contactrs::domain::models::cache_entry::CacheEntry;
use contactrs::domain::models::scrape_result::{ScrapeMethod, ScrapeResult};
use contactrs::domain::repositories::scrape_cache_repository::ScrapeCacheRepository;
use contactrs::domain::services::extraction::ExtractedContacts;
use contactrs::infrastructure::database::connection::create_in_memory;
use contactrs::infrastructure::repositories::scrape_cache_repo_impl::ScrapeCacheRepositoryImpl;
use std::sync::Arc;
use uuid::Uuid;

async fn setup_repo() -> ScrapeCacheRepositoryImpl {
    let db = create_in_memory().await.unwrap();
    ScrapeCacheRepositoryImpl::new(Arc::new(db))
}

fn result_with_email(email: &str) -> ScrapeResult {
    let contacts = ExtractedContacts {
        emails: vec![email.to_string()],
        ..Default::default()
    };
    ScrapeResult::succeeded(Uuid::new_v4(), "https://acme.io", contacts, ScrapeMethod::Static)
}

#[tokio::test]
async fn test_upsert_overwrites_existing_entry() {
    let repo = setup_repo().await;
    let now = Utc::now();

    repo.upsert(&CacheEntry::new(
        "https://acme.io",
        result_with_email("old@acme.io"),
        now - Duration::days(5),
        Duration::days(90),
    ))
    .await
    .unwrap();
    repo.upsert(&CacheEntry::new(
        "https://acme.io",
        result_with_email("new@acme.io"),
        now,
        Duration::days(90),
    ))
    .await
    .unwrap();

    let entry = repo.find_by_url("https://acme.io").await.unwrap().unwrap();
    assert_eq!(entry.result.email_address, "new@acme.io");
    assert!(entry.is_fresh(now));
    assert!(repo.find_by_url("https://other.io").await.unwrap().is_none());
}

#[tokio::test]
async fn test_entry_is_stale_after_retention() {
    let repo = setup_repo().await;
    let scraped = Utc::now() - Duration::days(91);
    repo.upsert(&CacheEntry::new(
        "https://acme.io",
        result_with_email("a@acme.io"),
        scraped,
        Duration::days(90),
    ))
    .await
    .unwrap();

    let entry = repo.find_by_url("https://acme.io").await.unwrap().unwrap();
    assert!(!entry.is_fresh(Utc::now()));

    assert_eq!(repo.purge_expired(Utc::now()).await.unwrap(), 1);
    assert!(repo.find_by_url("https://acme.io").await.unwrap().is_none());
}
