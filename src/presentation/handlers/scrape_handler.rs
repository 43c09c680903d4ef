// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::scrape_request::{BulkScrapeRequestDto, SingleScrapeRequestDto};
use crate::application::dto::scrape_response::{
    JobResultsResponseDto, JobStartedResponseDto, ListJobsQuery,
};
use crate::application::usecases::export_results::results_to_csv;
use crate::application::usecases::submit_scrape_job::{SubmitScrapeJobUseCase, UseCaseError};
use crate::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::presentation::errors::AppError;

const DEFAULT_LIST_LIMIT: u64 = 20;
const MAX_LIST_LIMIT: u64 = 100;

/// 提交单个URL抓取任务
pub async fn create_single(
    Extension(use_case): Extension<Arc<SubmitScrapeJobUseCase>>,
    Json(payload): Json<SingleScrapeRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let job = use_case
        .submit(vec![payload.url], payload.max_threads)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(JobStartedResponseDto::new(job.id, job.urls.len())),
    ))
}

/// 提交批量抓取任务
pub async fn create_bulk(
    Extension(use_case): Extension<Arc<SubmitScrapeJobUseCase>>,
    Json(payload): Json<BulkScrapeRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let job = use_case.submit(payload.urls, payload.max_threads).await?;

    Ok((
        StatusCode::CREATED,
        Json(JobStartedResponseDto::new(job.id, job.urls.len())),
    ))
}

/// 查询任务状态
pub async fn get_job(
    Extension(jobs): Extension<Arc<dyn ScrapeJobRepository>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let job = jobs.find_by_id(id).await?.ok_or(UseCaseError::NotFound(id))?;
    Ok(Json(job))
}

/// 最近的任务列表
pub async fn list_jobs(
    Extension(jobs): Extension<Arc<dyn ScrapeJobRepository>>,
    Query(query): Query<ListJobsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    Ok(Json(jobs.find_recent(limit).await?))
}

/// 查询任务的全部结果
pub async fn get_results(
    Extension(jobs): Extension<Arc<dyn ScrapeJobRepository>>,
    Extension(results): Extension<Arc<dyn ScrapeResultRepository>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if jobs.find_by_id(id).await?.is_none() {
        return Err(UseCaseError::NotFound(id).into());
    }

    let results = results.find_by_job_id(id).await?;
    Ok(Json(JobResultsResponseDto::from(results)))
}

/// 以CSV附件下载任务结果
pub async fn download_results(
    Extension(jobs): Extension<Arc<dyn ScrapeJobRepository>>,
    Extension(results): Extension<Arc<dyn ScrapeResultRepository>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if jobs.find_by_id(id).await?.is_none() {
        return Err(UseCaseError::NotFound(id).into());
    }

    let results = results.find_by_job_id(id).await?;
    if results.is_empty() {
        return Err(UseCaseError::NoResults(id).into());
    }

    let body = results_to_csv(&results)?;
    let disposition = format!("attachment; filename=scraping_results_{}.csv", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// 取消运行中的任务
pub async fn cancel_job(
    Extension(use_case): Extension<Arc<SubmitScrapeJobUseCase>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    use_case.cancel(id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "job_id": id, "status": "cancelling" })),
    ))
}
