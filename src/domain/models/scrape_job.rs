// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 抓取任务实体
///
/// 一个任务包含一组按提交顺序排列的URL，以及运行期间的计数器。
/// 状态转换遵循：Pending → InProgress → Completed/Failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 提交时的URL列表，创建后不再修改
    pub urls: Vec<String>,
    /// 并发上限
    pub max_threads: u32,
    /// 任务状态
    pub status: JobStatus,
    /// URL总数
    pub total_urls: u32,
    /// 成功数
    pub completed_urls: u32,
    /// 失败数
    pub failed_urls: u32,
    /// 进度百分比 (0-100)
    pub progress: u8,
    /// 任务失败时的错误信息
    pub error: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 完成时间
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScrapeJob {
    /// 创建待处理的新任务
    pub fn new(urls: Vec<String>, max_threads: u32) -> Self {
        let total_urls = urls.len() as u32;
        Self {
            id: Uuid::new_v4(),
            urls,
            max_threads,
            status: JobStatus::Pending,
            total_urls,
            completed_urls: 0,
            failed_urls: 0,
            progress: 0,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// 当前计数器快照
    pub fn counters(&self) -> JobProgress {
        JobProgress {
            completed: self.completed_urls,
            failed: self.failed_urls,
            total: self.total_urls,
        }
    }
}

/// 任务计数器快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobProgress {
    pub completed: u32,
    pub failed: u32,
    pub total: u32,
}

impl JobProgress {
    /// 进度百分比，按成功数计算
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as u64 * 100) / self.total as u64).min(100) as u8
    }

    /// 已处理（成功或失败）的URL数
    pub fn processed(&self) -> u32 {
        self.completed + self.failed
    }
}

/// 任务状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 已创建，尚未开始
    #[default]
    Pending,
    /// 运行中
    InProgress,
    /// 所有URL均已处理
    Completed,
    /// 任务级错误或被取消
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::InProgress => write!(f, "in_progress"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 无法识别的枚举字符串
#[derive(Debug, Error)]
#[error("unrecognized value: {0}")]
pub struct UnrecognizedValue(pub String);

impl FromStr for JobStatus {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "in_progress" => Ok(JobStatus::InProgress),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(UnrecognizedValue(other.to_string())),
        }
    }
}
