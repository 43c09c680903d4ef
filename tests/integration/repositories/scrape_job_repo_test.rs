// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use contactrs::domain::models::scrape_job::{JobProgress, JobStatus, ScrapeJob};
use contactrs::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use contactrs::infrastructure::database::connection::create_in_memory;
use contactrs::infrastructure::repositories::scrape_job_repo_impl::ScrapeJobRepositoryImpl;
use std::sync::Arc;
use uuid::Uuid;

async fn setup_repo() -> ScrapeJobRepositoryImpl {
    let db = create_in_memory().await.expect("sqlite should start");
    ScrapeJobRepositoryImpl::new(Arc::new(db))
}

#[tokio::test]
async fn test_create_and_find_job() {
    let repo = setup_repo().await;
    let job = ScrapeJob::new(vec!["acme.io".into(), "https://b.test/contact".into()], 3);

    repo.create(&job).await.unwrap();
    let found = repo.find_by_id(job.id).await.unwrap().unwrap();

    assert_eq!(found.urls, job.urls);
    assert_eq!(found.max_threads, 3);
    assert_eq!(found.status, JobStatus::Pending);
    assert_eq!(found.total_urls, 2);
    assert_eq!(found.completed_at, None);
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_progress_and_status_updates() {
    let repo = setup_repo().await;
    let job = ScrapeJob::new(vec!["a.test".into(), "b.test".into(), "c.test".into()], 1);
    repo.create(&job).await.unwrap();

    repo.update_status(job.id, JobStatus::InProgress, None, None)
        .await
        .unwrap();
    repo.update_progress(
        job.id,
        JobProgress {
            completed: 2,
            failed: 1,
            total: 3,
        },
    )
    .await
    .unwrap();
    let finished_at = Utc::now();
    repo.update_status(job.id, JobStatus::Completed, None, Some(finished_at))
        .await
        .unwrap();

    let found = repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(found.status, JobStatus::Completed);
    assert_eq!(found.completed_urls, 2);
    assert_eq!(found.failed_urls, 1);
    assert_eq!(found.progress, 66);
    let stored_at = found.completed_at.unwrap();
    assert!((stored_at - finished_at).num_seconds().abs() < 1);
}

#[tokio::test]
async fn test_failed_status_keeps_error_message() {
    let repo = setup_repo().await;
    let job = ScrapeJob::new(vec!["a.test".into()], 1);
    repo.create(&job).await.unwrap();

    repo.update_status(
        job.id,
        JobStatus::Failed,
        Some("cancelled".into()),
        Some(Utc::now()),
    )
    .await
    .unwrap();

    let found = repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(found.status, JobStatus::Failed);
    assert_eq!(found.error.as_deref(), Some("cancelled"));
}

#[tokio::test]
async fn test_updating_missing_job_is_not_found() {
    let repo = setup_repo().await;

    let err = repo
        .update_status(Uuid::new_v4(), JobStatus::Completed, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[tokio::test]
async fn test_find_recent_orders_by_creation_time() {
    let repo = setup_repo().await;
    let mut ids = Vec::new();
    for age in [3, 1, 2] {
        let mut job = ScrapeJob::new(vec!["a.test".into()], 1);
        job.created_at = Utc::now() - Duration::hours(age);
        repo.create(&job).await.unwrap();
        ids.push((age, job.id));
    }

    let recent = repo.find_recent(2).await.unwrap();
    let expected: Vec<Uuid> = [1, 2]
        .iter()
        .map(|age| ids.iter().find(|(a, _)| a == age).unwrap().1)
        .collect();
    assert_eq!(recent.iter().map(|j| j.id).collect::<Vec<_>>(), expected);
}
