// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::models::scrape_job::UnrecognizedValue;
use crate::domain::services::extraction::ExtractedContacts;

/// 页面获取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMethod {
    /// 直接HTTP请求
    Static,
    /// 无头浏览器渲染
    Dynamic,
}

impl ScrapeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeMethod::Static => "static",
            ScrapeMethod::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for ScrapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapeMethod {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(ScrapeMethod::Static),
            "dynamic" => Ok(ScrapeMethod::Dynamic),
            other => Err(UnrecognizedValue(other.to_string())),
        }
    }
}

/// 页面中识别出的人员
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
}

/// 社交主页链接，每个平台最多一个
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfiles {
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub facebook_url: String,
    #[serde(default)]
    pub instagram_url: String,
    #[serde(default)]
    pub github_url: String,
}

/// 单个URL的抓取结果
///
/// 每个输入URL对应一条记录，创建后不可修改。失败记录的字段为空，
/// `success` 为 false 并携带错误信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// 结果ID
    pub id: Uuid,
    /// 所属任务ID
    pub job_id: Uuid,
    /// 规范化后的URL
    pub url: String,
    /// E.164 格式的电话号码，已去重排序
    pub phone_numbers: Vec<String>,
    /// 主要邮箱（小写）
    pub email_address: String,
    /// 社交主页
    #[serde(flatten)]
    pub social: SocialProfiles,
    /// 人员列表
    pub persons: Vec<PersonRecord>,
    /// 公司地址
    pub company_address: String,
    /// 抓取时间
    pub scraped_at: DateTime<Utc>,
    /// 获取方式，合成的失败记录没有该字段
    pub method: Option<ScrapeMethod>,
    /// 是否成功
    pub success: bool,
    /// 失败原因
    pub error: Option<String>,
}

impl ScrapeResult {
    /// 由提取结果构造成功记录
    pub fn succeeded(
        job_id: Uuid,
        url: impl Into<String>,
        contacts: ExtractedContacts,
        method: ScrapeMethod,
    ) -> Self {
        let email_address = contacts.primary_email().to_string();
        Self {
            id: Uuid::new_v4(),
            job_id,
            url: url.into(),
            phone_numbers: contacts.phone_numbers,
            email_address,
            social: contacts.social,
            persons: contacts.persons,
            company_address: contacts.company_address,
            scraped_at: Utc::now(),
            method: Some(method),
            success: true,
            error: None,
        }
    }

    /// 构造失败记录
    pub fn failed(job_id: Uuid, url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            url: url.into(),
            phone_numbers: Vec::new(),
            email_address: String::new(),
            social: SocialProfiles::default(),
            persons: Vec::new(),
            company_address: String::new(),
            scraped_at: Utc::now(),
            method: None,
            success: false,
            error: Some(error.into()),
        }
    }

    /// 将缓存中的结果复制为当前任务的新记录
    ///
    /// 生成新的ID并改写 `job_id`，其余字段（包括 `method` 和 `scraped_at`）保持不变
    pub fn restamp(&self, job_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            ..self.clone()
        }
    }
}
