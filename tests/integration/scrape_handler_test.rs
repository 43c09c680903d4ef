// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{Harness, ScriptedFetcher, CONTACT_PAGE};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_test::TestServer;
use contactrs::application::usecases::submit_scrape_job::{SubmitScrapeJobUseCase, ThreadLimits};
use contactrs::domain::models::scrape_job::{JobStatus, ScrapeJob};
use contactrs::domain::models::scrape_result::ScrapeMethod;
use contactrs::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use contactrs::presentation::routes::{routes, AppComponents};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use uuid::Uuid;

struct TestApp {
    server: TestServer,
    harness: Harness,
}

fn build_router(harness: &Harness) -> Router {
    let use_case = Arc::new(SubmitScrapeJobUseCase::new(
        harness.jobs.clone(),
        harness.orchestrator.clone(),
        ThreadLimits::default(),
    ));

    routes(AppComponents {
        use_case,
        jobs: harness.jobs.clone(),
        results: harness.results.clone(),
        hub: harness.hub.clone(),
    })
}

fn create_test_app() -> TestApp {
    let fetcher = Arc::new(
        ScriptedFetcher::new(ScrapeMethod::Static).page("https://acme-robotics.io", CONTACT_PAGE),
    );
    let harness = Harness::new(vec![fetcher]);
    let app = build_router(&harness);

    TestApp {
        server: TestServer::new(app).unwrap(),
        harness,
    }
}

async fn wait_for_completion(app: &TestApp, job_id: Uuid) {
    for _ in 0..100 {
        let job = app.harness.jobs.find_by_id(job_id).await.unwrap().unwrap();
        if job.status == JobStatus::Completed {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {} did not complete", job_id);
}

fn job_id_of(body: &Value) -> Uuid {
    let raw = body["job_id"].as_str().expect("job_id should be a string");
    Uuid::parse_str(raw).expect("valid UUID")
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_single_scrape_starts_job_and_exposes_results() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/scrape/single")
        .json(&json!({ "url": "acme-robotics.io" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "started");
    let job_id = job_id_of(&body);

    wait_for_completion(&app, job_id).await;

    let job = app
        .server
        .get(&format!("/api/scrape/job/{}", job_id))
        .await
        .json::<Value>();
    assert_eq!(job["status"], "completed");
    assert_eq!(job["completed_urls"], 1);

    let results = app
        .server
        .get(&format!("/api/scrape/results/{}", job_id))
        .await
        .json::<Value>();
    assert_eq!(results["count"], 1);
    assert_eq!(results["results"][0]["email_address"], "sales@acme-robotics.io");
    assert_eq!(
        results["results"][0]["linkedin_url"],
        "https://www.linkedin.com/company/acme-robotics"
    );
}

#[tokio::test]
async fn test_download_exports_results_as_csv() {
    let app = create_test_app();

    let body = app
        .server
        .post("/api/scrape/single")
        .json(&json!({ "url": "acme-robotics.io" }))
        .await
        .json::<Value>();
    let job_id = job_id_of(&body);
    wait_for_completion(&app, job_id).await;

    let response = app
        .server
        .get(&format!("/api/scrape/download/{}", job_id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/csv");
    let disposition = response.header("content-disposition");
    assert_eq!(
        disposition.to_str().unwrap(),
        format!("attachment; filename=scraping_results_{}.csv", job_id)
    );

    let text = response.text();
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let header = reader.headers().unwrap().clone();
    assert_eq!(&header[0], "input_url");
    assert_eq!(&header[header.len() - 1], "person_phone_5");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "https://acme-robotics.io");
    assert_eq!(&rows[0][2], "sales@acme-robotics.io");
    assert_eq!(&rows[0][3], "https://www.linkedin.com/company/acme-robotics");
}

#[tokio::test]
async fn test_download_without_results_is_not_found() {
    let app = create_test_app();
    let job = ScrapeJob::new(vec!["acme-robotics.io".into()], 1);
    app.harness.jobs.create(&job).await.unwrap();

    let response = app
        .server
        .get(&format!("/api/scrape/download/{}", job.id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("No results found"));
}

#[tokio::test]
async fn test_bulk_scrape_drops_blank_urls() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/scrape/bulk")
        .json(&json!({ "urls": ["acme-robotics.io", "  ", ""], "max_threads": 2 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let job_id = job_id_of(&response.json::<Value>());

    let job = app.harness.jobs.find_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(job.total_urls, 1);
    assert_eq!(job.max_threads, 2);
}

#[tokio::test]
async fn test_bulk_scrape_rejects_invalid_requests() {
    let app = create_test_app();

    app.server
        .post("/api/scrape/bulk")
        .json(&json!({ "urls": ["acme-robotics.io"], "max_threads": 26 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/api/scrape/bulk")
        .json(&json!({ "urls": ["   "] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/api/scrape/bulk")
        .json(&json!({ "urls": [] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_job_returns_not_found() {
    let app = create_test_app();
    let id = Uuid::new_v4();

    app.server
        .get(&format!("/api/scrape/job/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .get(&format!("/api/scrape/results/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete(&format!("/api/scrape/job/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .get(&format!("/api/scrape/download/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_finished_job_conflicts() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/scrape/single")
        .json(&json!({ "url": "acme-robotics.io", "max_threads": 1 }))
        .await;
    let job_id = job_id_of(&response.json::<Value>());
    wait_for_completion(&app, job_id).await;

    // 任务标记完成后运行令牌才会被移除
    let mut status = StatusCode::ACCEPTED;
    for _ in 0..50 {
        status = app
            .server
            .delete(&format!("/api/scrape/job/{}", job_id))
            .await
            .status_code();
        if status == StatusCode::CONFLICT {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_jobs_returns_most_recent_first() {
    let app = create_test_app();

    for _ in 0..3 {
        app.server
            .post("/api/scrape/single")
            .json(&json!({ "url": "acme-robotics.io" }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let jobs = app
        .server
        .get("/api/scrape/jobs")
        .add_query_param("limit", 2)
        .await
        .json::<Vec<Value>>();
    assert_eq!(jobs.len(), 2);
}

#[tokio::test]
async fn test_version_endpoint() {
    let app = create_test_app();

    let body = app.server.get("/api/version").await.json::<Value>();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

/// 服务说明端点
///
/// 直接以 oneshot 方式调用路由，不经过测试服务器
#[tokio::test]
async fn test_banner_describes_service() {
    let harness = Harness::new(vec![]);
    let app = build_router(&harness);

    let response = app
        .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["service"], "contactrs");
    assert_eq!(body["websocket"], "/ws");
}
