// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::submit_scrape_job::SubmitScrapeJobUseCase;
use crate::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::infrastructure::broadcast::broadcast_hub::BroadcastHub;
use crate::presentation::handlers::{progress_handler, scrape_handler};
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 路由依赖的共享组件
#[derive(Clone)]
pub struct AppComponents {
    pub use_case: Arc<SubmitScrapeJobUseCase>,
    pub jobs: Arc<dyn ScrapeJobRepository>,
    pub results: Arc<dyn ScrapeResultRepository>,
    pub hub: BroadcastHub,
}

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由，共享组件通过 `Extension` 注入
pub fn routes(components: AppComponents) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api", get(banner))
        .route("/api/version", get(version))
        .route("/api/scrape/single", post(scrape_handler::create_single))
        .route("/api/scrape/bulk", post(scrape_handler::create_bulk))
        .route("/api/scrape/jobs", get(scrape_handler::list_jobs))
        .route(
            "/api/scrape/job/{id}",
            get(scrape_handler::get_job).delete(scrape_handler::cancel_job),
        )
        .route("/api/scrape/results/{id}", get(scrape_handler::get_results))
        .route(
            "/api/scrape/download/{id}",
            get(scrape_handler::download_results),
        )
        .route("/ws", get(progress_handler::progress_ws))
        .layer(Extension(components.use_case))
        .layer(Extension(components.jobs))
        .layer(Extension(components.results))
        .layer(Extension(components.hub))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 服务说明
pub async fn banner() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "description": "Batch contact information scraper",
        "version": env!("CARGO_PKG_VERSION"),
        "websocket": "/ws",
    }))
}

/// 版本信息端点
pub async fn version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}
