// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::scrape_job::JobProgress;
use crate::domain::models::scrape_result::ScrapeResult;

/// 任务进度事件
///
/// 序列化后以 `type` 字段区分事件类型，直接作为 WebSocket 文本帧发送。
/// 同一URL的事件顺序为 `url_start` → `url_complete`/`url_error`，
/// `job_complete` 与 `job_error` 在所有URL事件之后发出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    UrlStart {
        job_id: Uuid,
        url: String,
        index: usize,
        timestamp: DateTime<Utc>,
    },
    UrlComplete {
        job_id: Uuid,
        url: String,
        index: usize,
        success: bool,
        data: Option<ScrapeResult>,
        error: Option<String>,
        timestamp: DateTime<Utc>,
    },
    UrlError {
        job_id: Uuid,
        url: String,
        index: usize,
        error: String,
        timestamp: DateTime<Utc>,
    },
    ProgressUpdate {
        job_id: Uuid,
        progress: u8,
        completed: u32,
        total: u32,
        failed: u32,
        timestamp: DateTime<Utc>,
    },
    JobComplete {
        job_id: Uuid,
        total: u32,
        completed: u32,
        failed: u32,
        timestamp: DateTime<Utc>,
    },
    JobError {
        job_id: Uuid,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl ProgressEvent {
    pub fn url_start(job_id: Uuid, url: &str, index: usize) -> Self {
        ProgressEvent::UrlStart {
            job_id,
            url: url.to_string(),
            index,
            timestamp: Utc::now(),
        }
    }

    /// 成功时携带完整结果，失败时携带错误文本
    pub fn url_complete(job_id: Uuid, url: &str, index: usize, result: &ScrapeResult) -> Self {
        ProgressEvent::UrlComplete {
            job_id,
            url: url.to_string(),
            index,
            success: result.success,
            data: result.success.then(|| result.clone()),
            error: result.error.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn url_error(job_id: Uuid, url: &str, index: usize, error: impl Into<String>) -> Self {
        ProgressEvent::UrlError {
            job_id,
            url: url.to_string(),
            index,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn progress_update(job_id: Uuid, progress: JobProgress) -> Self {
        ProgressEvent::ProgressUpdate {
            job_id,
            progress: progress.percent(),
            completed: progress.completed,
            total: progress.total,
            failed: progress.failed,
            timestamp: Utc::now(),
        }
    }

    pub fn job_complete(job_id: Uuid, progress: JobProgress) -> Self {
        ProgressEvent::JobComplete {
            job_id,
            total: progress.total,
            completed: progress.completed,
            failed: progress.failed,
            timestamp: Utc::now(),
        }
    }

    pub fn job_error(job_id: Uuid, error: impl Into<String>) -> Self {
        ProgressEvent::JobError {
            job_id,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn job_id(&self) -> Uuid {
        match self {
            ProgressEvent::UrlStart { job_id, .. }
            | ProgressEvent::UrlComplete { job_id, .. }
            | ProgressEvent::UrlError { job_id, .. }
            | ProgressEvent::ProgressUpdate { job_id, .. }
            | ProgressEvent::JobComplete { job_id, .. }
            | ProgressEvent::JobError { job_id, .. } => *job_id,
        }
    }

    /// 事件类型名，与序列化后的 `type` 字段一致
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::UrlStart { .. } => "url_start",
            ProgressEvent::UrlComplete { .. } => "url_complete",
            ProgressEvent::UrlError { .. } => "url_error",
            ProgressEvent::ProgressUpdate { .. } => "progress_update",
            ProgressEvent::JobComplete { .. } => "job_complete",
            ProgressEvent::JobError { .. } => "job_error",
        }
    }

    /// URL级事件的提交序号
    pub fn index(&self) -> Option<usize> {
        match self {
            ProgressEvent::UrlStart { index, .. }
            | ProgressEvent::UrlComplete { index, .. }
            | ProgressEvent::UrlError { index, .. } => Some(*index),
            _ => None,
        }
    }
}
