// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use contactrs::domain::models::progress_event::ProgressEvent;
use contactrs::domain::models::scrape_result::ScrapeMethod;
use contactrs::domain::services::extraction::ExtractionService;
use contactrs::domain::services::rate_limiting_service::{DomainRateLimiter, RateLimitConfig};
use contactrs::engines::router::FetchRouter;
use contactrs::engines::traits::{FetchError, FetchedPage, PageFetcher};
use contactrs::infrastructure::broadcast::broadcast_hub::BroadcastHub;
use contactrs::infrastructure::cache::result_cache::ResultCache;
use contactrs::infrastructure::repositories::memory_repo_impl::{
    InMemoryScrapeCacheRepository, InMemoryScrapeJobRepository, InMemoryScrapeResultRepository,
};
use contactrs::workers::job_orchestrator::JobOrchestrator;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const CONTACT_PAGE: &str = r#"<html><body>
<h1>Acme Robotics</h1>
<p>Call us at (415) 555-0132 or write to sales@acme-robotics.io</p>
<a href="https://www.linkedin.com/company/acme-robotics">LinkedIn</a>
<div class="address">1200 Market Street, San Francisco, CA 94102</div>
</body></html>"#;

/// 按URL预设结果的获取器
pub struct ScriptedFetcher {
    method: ScrapeMethod,
    pages: HashMap<String, Result<String, u16>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(method: ScrapeMethod) -> Self {
        Self {
            method,
            pages: HashMap::new(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.pages.get(url) {
            Some(Ok(html)) => Ok(FetchedPage::from_html(html.as_str(), self.method)),
            Some(Err(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Timeout),
        }
    }

    fn method(&self) -> ScrapeMethod {
        self.method
    }
}

/// 测试用的完整编排环境
pub struct Harness {
    pub jobs: Arc<InMemoryScrapeJobRepository>,
    pub results: Arc<InMemoryScrapeResultRepository>,
    pub cache: Arc<InMemoryScrapeCacheRepository>,
    pub hub: BroadcastHub,
    pub orchestrator: JobOrchestrator,
}

impl Harness {
    pub fn new(fetchers: Vec<Arc<dyn PageFetcher>>) -> Self {
        let jobs = Arc::new(InMemoryScrapeJobRepository::new());
        let results = Arc::new(InMemoryScrapeResultRepository::new());
        let cache = Arc::new(InMemoryScrapeCacheRepository::new());
        let hub = BroadcastHub::new(1024);

        let limiter = Arc::new(DomainRateLimiter::new(RateLimitConfig {
            max_requests_per_domain: 100,
            window: Duration::from_secs(60),
            poll_interval: Duration::from_millis(10),
        }));
        let orchestrator = JobOrchestrator::new(
            jobs.clone(),
            results.clone(),
            ResultCache::new(cache.clone(), chrono::Duration::days(90)),
            Arc::new(FetchRouter::new(limiter, fetchers)),
            Arc::new(ExtractionService::default()),
            Arc::new(hub.clone()),
        );

        Self {
            jobs,
            results,
            cache,
            hub,
            orchestrator,
        }
    }
}

/// 收集订阅到的全部事件
pub fn drain(rx: &mut mpsc::Receiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
