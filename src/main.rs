// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use contactrs::application::usecases::submit_scrape_job::{
    SubmitScrapeJobUseCase, ThreadLimits,
};
use contactrs::config::settings::{CacheBackend, Settings};
use contactrs::domain::repositories::scrape_cache_repository::ScrapeCacheRepository;
use contactrs::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use contactrs::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use contactrs::domain::services::extraction::{ExtractionConfig, ExtractionService};
use contactrs::domain::services::rate_limiting_service::{DomainRateLimiter, RateLimitConfig};
use contactrs::engines::playwright_engine::{DynamicFetchConfig, DynamicFetcher};
use contactrs::engines::reqwest_engine::{StaticFetchConfig, StaticFetcher};
use contactrs::engines::router::FetchRouter;
use contactrs::engines::user_agents::UserAgentPool;
use contactrs::infrastructure::broadcast::broadcast_hub::BroadcastHub;
use contactrs::infrastructure::cache::redis_cache_repo::RedisScrapeCacheRepository;
use contactrs::infrastructure::cache::redis_client::RedisClient;
use contactrs::infrastructure::cache::result_cache::ResultCache;
use contactrs::infrastructure::database::connection;
use contactrs::infrastructure::repositories::memory_repo_impl::InMemoryScrapeCacheRepository;
use contactrs::infrastructure::repositories::scrape_cache_repo_impl::ScrapeCacheRepositoryImpl;
use contactrs::infrastructure::repositories::scrape_job_repo_impl::ScrapeJobRepositoryImpl;
use contactrs::infrastructure::repositories::scrape_result_repo_impl::ScrapeResultRepositoryImpl;
use contactrs::presentation::routes::{self, AppComponents};
use contactrs::utils::telemetry;
use contactrs::workers::cache_expiration_worker::CacheExpirationWorker;
use contactrs::workers::job_orchestrator::JobOrchestrator;
use contactrs::workers::Worker;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting contactrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    if settings.metrics.enabled {
        contactrs::infrastructure::metrics::init_metrics(settings.metrics.listen_addr);
    }

    // 3. Connect to database, migrations run on connect
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    let job_repo: Arc<dyn ScrapeJobRepository> = Arc::new(ScrapeJobRepositoryImpl::new(db.clone()));
    let result_repo: Arc<dyn ScrapeResultRepository> =
        Arc::new(ScrapeResultRepositoryImpl::new(db.clone()));

    // 4. Result cache backend
    let cache_repo: Arc<dyn ScrapeCacheRepository> = match settings.cache.backend {
        CacheBackend::Database => Arc::new(ScrapeCacheRepositoryImpl::new(db.clone())),
        CacheBackend::Memory => Arc::new(InMemoryScrapeCacheRepository::new()),
        CacheBackend::Redis => {
            let url = settings
                .redis
                .url
                .as_deref()
                .context("cache.backend = redis requires redis.url")?;
            let client = RedisClient::new(url).await?;
            info!("Redis client initialized");
            Arc::new(RedisScrapeCacheRepository::new(client))
        }
    };
    info!(backend = ?settings.cache.backend, "Result cache initialized");
    let cache = ResultCache::new(cache_repo.clone(), settings.cache.retention());

    // 5. Fetch engines
    let rate_limiter = Arc::new(DomainRateLimiter::new(RateLimitConfig {
        max_requests_per_domain: settings.rate_limiting.max_requests_per_domain,
        window: settings.rate_limiting.window(),
        poll_interval: settings.rate_limiting.poll_interval(),
    }));
    let user_agents = Arc::new(UserAgentPool::new(settings.fetch.user_agents.clone()));
    let static_fetcher = StaticFetcher::new(
        &StaticFetchConfig {
            request_timeout: Duration::from_secs(settings.fetch.request_timeout_secs),
            connect_timeout: Duration::from_secs(settings.fetch.connect_timeout_secs),
            max_redirects: settings.fetch.max_redirects,
        },
        user_agents.clone(),
    )?;
    let dynamic_fetcher = DynamicFetcher::new(
        DynamicFetchConfig {
            navigation_timeout: Duration::from_secs(settings.fetch.navigation_timeout_secs),
            settle_delay: Duration::from_millis(settings.fetch.settle_delay_ms),
            remote_url: settings.fetch.chromium_remote_url.clone(),
        },
        user_agents,
    );
    let router = Arc::new(FetchRouter::with_fallback(
        rate_limiter,
        Arc::new(static_fetcher),
        Arc::new(dynamic_fetcher),
    ));

    let extractor = Arc::new(ExtractionService::new(ExtractionConfig::with_region(
        &settings.extraction.default_region,
        settings.extraction.max_persons,
        settings.extraction.max_address_len,
    )));

    // 6. Orchestration
    let hub = BroadcastHub::new(settings.broadcast.subscriber_buffer);
    let orchestrator = JobOrchestrator::new(
        job_repo.clone(),
        result_repo.clone(),
        cache,
        router,
        extractor,
        Arc::new(hub.clone()),
    );
    let use_case = Arc::new(SubmitScrapeJobUseCase::new(
        job_repo.clone(),
        orchestrator,
        ThreadLimits {
            default_max_threads: settings.scraping.default_max_threads,
            max_threads_limit: settings.scraping.max_threads_limit,
        },
    ));

    // 7. Start workers
    let shutdown = CancellationToken::new();
    let sweeper = CacheExpirationWorker::new(
        cache_repo,
        Duration::from_secs(settings.cache.sweep_interval_secs),
        shutdown.clone(),
    )
    .spawn();

    // 8. Start HTTP server
    let app = routes::routes(AppComponents {
        use_case: use_case.clone(),
        jobs: job_repo,
        results: result_repo,
        hub,
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            server_shutdown.cancel();
        })
        .await?;

    shutdown.cancel();
    if use_case.cancel_all() > 0 && !use_case.wait_until_idle(Duration::from_secs(30)).await {
        warn!("Running scrape jobs did not finish before shutdown");
    }
    let _ = sweeper.await;
    Ok(())
}
