// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{drain, Harness, ScriptedFetcher, CONTACT_PAGE};
use async_trait::async_trait;
use contactrs::domain::models::progress_event::ProgressEvent;
use contactrs::domain::models::scrape_job::{JobStatus, ScrapeJob};
use contactrs::domain::models::scrape_result::ScrapeMethod;
use contactrs::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use contactrs::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use contactrs::engines::traits::{FetchError, FetchedPage, PageFetcher};
use contactrs::workers::job_orchestrator::{OrchestratorError, CANCELLED_URL_ERROR};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

async fn submit(harness: &Harness, urls: &[&str], max_threads: u32) -> ScrapeJob {
    let job = ScrapeJob::new(urls.iter().map(|u| u.to_string()).collect(), max_threads);
    harness.jobs.create(&job).await.unwrap()
}

#[tokio::test]
async fn test_mixed_batch_completes_with_one_failure() {
    let static_fetcher = Arc::new(
        ScriptedFetcher::new(ScrapeMethod::Static).page("https://example.com", CONTACT_PAGE),
    );
    let dynamic_fetcher = Arc::new(ScriptedFetcher::new(ScrapeMethod::Dynamic));
    let harness = Harness::new(vec![static_fetcher, dynamic_fetcher.clone()]);
    let (_, mut rx) = harness.hub.subscribe();

    let job = submit(&harness, &["example.com", "bad-domain-that-times-out.test"], 2).await;
    let progress = harness
        .orchestrator
        .run(job.clone(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(progress.completed, 1);
    assert_eq!(progress.failed, 1);
    assert_eq!(progress.total, 2);
    // 只有失败的URL会进入浏览器回退
    assert_eq!(dynamic_fetcher.calls(), 1);

    let stored = harness.jobs.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.completed_urls + stored.failed_urls, stored.total_urls);
    assert_eq!(stored.progress, 50);
    assert!(stored.completed_at.is_some());

    let events = drain(&mut rx);
    let terminal: BTreeSet<usize> = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::UrlComplete { .. } | ProgressEvent::UrlError { .. }))
        .filter_map(|e| e.index())
        .collect();
    assert_eq!(terminal, BTreeSet::from([0, 1]));

    let completes: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::JobComplete { .. }))
        .collect();
    assert_eq!(completes.len(), 1);
    assert!(matches!(completes[0], ProgressEvent::JobComplete { total: 2, .. }));
    assert_eq!(events.last().map(|e| e.kind()), Some("job_complete"));

    let results = harness.results.find_by_job_id(job.id).await.unwrap();
    assert_eq!(results.len(), 2);
    let failed = results.iter().find(|r| !r.success).unwrap();
    assert_eq!(failed.url, "https://bad-domain-that-times-out.test");
    assert_eq!(failed.error.as_deref(), Some("Failed to scrape with both methods"));
    assert_eq!(failed.method, None);
    let succeeded = results.iter().find(|r| r.success).unwrap();
    assert_eq!(succeeded.email_address, "sales@acme-robotics.io");
    assert_eq!(succeeded.method, Some(ScrapeMethod::Static));
}

#[tokio::test]
async fn test_per_url_events_start_before_terminal_event() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(ScrapeMethod::Static)
            .page("https://a.test", CONTACT_PAGE)
            .page("https://b.test", CONTACT_PAGE)
            .page("https://c.test", CONTACT_PAGE),
    );
    let harness = Harness::new(vec![fetcher]);
    let (_, mut rx) = harness.hub.subscribe();

    let job = submit(&harness, &["a.test", "b.test", "c.test"], 3).await;
    harness
        .orchestrator
        .run(job, CancellationToken::new())
        .await
        .unwrap();

    let events = drain(&mut rx);
    for index in 0..3 {
        let kinds: Vec<&str> = events
            .iter()
            .filter(|e| e.index() == Some(index))
            .map(|e| e.kind())
            .collect();
        assert_eq!(kinds, vec!["url_start", "url_complete"]);
    }

    let last_progress = events
        .iter()
        .rev()
        .find_map(|e| match e {
            ProgressEvent::ProgressUpdate {
                completed, total, ..
            } => Some((*completed, *total)),
            _ => None,
        })
        .unwrap();
    assert_eq!(last_progress, (3, 3));
}

#[tokio::test]
async fn test_second_job_is_served_from_cache() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(ScrapeMethod::Static).page("https://acme-robotics.io", CONTACT_PAGE),
    );
    let harness = Harness::new(vec![fetcher.clone()]);

    let first = submit(&harness, &["acme-robotics.io"], 1).await;
    harness
        .orchestrator
        .run(first.clone(), CancellationToken::new())
        .await
        .unwrap();

    let second = submit(&harness, &["acme-robotics.io"], 1).await;
    harness
        .orchestrator
        .run(second.clone(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(harness.cache.len(), 1);

    let original = &harness.results.find_by_job_id(first.id).await.unwrap()[0];
    let cached = &harness.results.find_by_job_id(second.id).await.unwrap()[0];
    assert_ne!(original.id, cached.id);
    assert_eq!(cached.job_id, second.id);
    assert_eq!(cached.method, Some(ScrapeMethod::Static));
    assert_eq!(cached.scraped_at, original.scraped_at);
    assert_eq!(cached.email_address, original.email_address);
}

#[tokio::test]
async fn test_static_failure_falls_back_to_browser() {
    let static_fetcher = Arc::new(
        ScriptedFetcher::new(ScrapeMethod::Static).status("https://spa.acme.io", 500),
    );
    let dynamic_fetcher = Arc::new(
        ScriptedFetcher::new(ScrapeMethod::Dynamic).page("https://spa.acme.io", CONTACT_PAGE),
    );
    let harness = Harness::new(vec![static_fetcher.clone(), dynamic_fetcher.clone()]);

    let job = submit(&harness, &["https://spa.acme.io"], 1).await;
    harness
        .orchestrator
        .run(job.clone(), CancellationToken::new())
        .await
        .unwrap();

    let results = harness.results.find_by_job_id(job.id).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].method, Some(ScrapeMethod::Dynamic));
    assert_eq!(static_fetcher.calls(), 1);
    assert_eq!(dynamic_fetcher.calls(), 1);
}

#[tokio::test]
async fn test_duplicate_urls_each_get_a_result() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(ScrapeMethod::Static).page("https://acme-robotics.io", CONTACT_PAGE),
    );
    let harness = Harness::new(vec![fetcher]);

    let job = submit(&harness, &["acme-robotics.io", " acme-robotics.io "], 1).await;
    let progress = harness
        .orchestrator
        .run(job.clone(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(progress.completed, 2);
    let results = harness.results.find_by_job_id(job.id).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.url == "https://acme-robotics.io"));
}

#[tokio::test]
async fn test_cancelled_job_records_unstarted_urls() {
    let fetcher = Arc::new(
        ScriptedFetcher::new(ScrapeMethod::Static)
            .page("https://slow-1.test", CONTACT_PAGE)
            .page("https://slow-2.test", CONTACT_PAGE)
            .page("https://slow-3.test", CONTACT_PAGE)
            .delay(Duration::from_millis(300)),
    );
    let harness = Harness::new(vec![fetcher]);
    let (_, mut rx) = harness.hub.subscribe();

    let job = submit(&harness, &["slow-1.test", "slow-2.test", "slow-3.test"], 1).await;
    let cancel = CancellationToken::new();
    let orchestrator = harness.orchestrator.clone();
    let run = tokio::spawn({
        let job = job.clone();
        let cancel = cancel.clone();
        async move { orchestrator.run(job, cancel).await }
    });

    // 等待第一个URL开始获取
    loop {
        if let Ok(event) = rx.try_recv() {
            if event.kind() == "url_start" {
                break;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cancel.cancel();

    let err = run.await.unwrap().unwrap_err();
    assert!(matches!(err, OrchestratorError::Cancelled));

    let stored = harness.jobs.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert_eq!(stored.error.as_deref(), Some("cancelled"));
    assert_eq!(stored.completed_urls + stored.failed_urls, 3);

    let results = harness.results.find_by_job_id(job.id).await.unwrap();
    assert_eq!(results.len(), 3);
    let cancelled = results
        .iter()
        .filter(|r| r.error.as_deref() == Some(CANCELLED_URL_ERROR))
        .count();
    assert_eq!(cancelled, 2);

    let events = drain(&mut rx);
    assert_eq!(events.last().map(|e| e.kind()), Some("job_error"));
    assert!(!events.iter().any(|e| e.kind() == "job_complete"));
}

/// 记录同时进行中的获取数峰值
#[derive(Default)]
struct InFlightFetcher {
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl PageFetcher for InFlightFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(FetchedPage::from_html(CONTACT_PAGE, ScrapeMethod::Static))
    }

    fn method(&self) -> ScrapeMethod {
        ScrapeMethod::Static
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_fetches_never_exceed_max_threads() {
    // Given: 12个URL，并发上限为3
    let fetcher = Arc::new(InFlightFetcher::default());
    let harness = Harness::new(vec![fetcher.clone()]);
    let urls: Vec<String> = (0..12).map(|i| format!("https://site{}.test", i)).collect();
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let job = submit(&harness, &url_refs, 3).await;

    // When: 运行任务
    let progress = harness
        .orchestrator
        .run(job, CancellationToken::new())
        .await
        .unwrap();

    // Then: 全部完成，且同时进行的获取数不超过上限
    assert_eq!(progress.completed, 12);
    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak in-flight fetches was {}", peak);
    assert!(peak >= 2, "fetches should overlap, peak was {}", peak);
}
