// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 联系信息提取
//!
//! 纯函数流水线：页面内容 → 电话、邮箱、社交主页、人员与公司地址。
//! 提取从不失败，缺失的字段为空

pub mod address;
pub mod emails;
pub mod persons;
pub mod phones;
pub mod social;

use phonenumber::country;
use tracing::warn;

use crate::domain::models::scrape_result::{PersonRecord, SocialProfiles};
use crate::engines::traits::FetchedPage;

/// 提取配置
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// 无国际前缀号码的默认地区
    pub default_region: country::Id,
    /// 最多提取的人员数
    pub max_persons: usize,
    /// 公司地址最大字符数
    pub max_address_len: usize,
}

impl ExtractionConfig {
    /// 使用地区代码（如 `US`）构造配置，无法识别时退回 `US`
    pub fn with_region(region_code: &str, max_persons: usize, max_address_len: usize) -> Self {
        let default_region = region_code
            .trim()
            .to_ascii_uppercase()
            .parse::<country::Id>()
            .unwrap_or_else(|_| {
                warn!(region_code, "unknown phone region, falling back to US");
                country::Id::US
            });

        Self {
            default_region,
            max_persons,
            max_address_len,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_region: country::Id::US,
            max_persons: 5,
            max_address_len: 200,
        }
    }
}

/// 从单个页面提取出的联系信息
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContacts {
    pub phone_numbers: Vec<String>,
    pub emails: Vec<String>,
    pub social: SocialProfiles,
    pub persons: Vec<PersonRecord>,
    pub company_address: String,
}

impl ExtractedContacts {
    /// 首个邮箱作为主要邮箱
    pub fn primary_email(&self) -> &str {
        self.emails.first().map(String::as_str).unwrap_or_default()
    }
}

/// 提取服务
pub struct ExtractionService {
    config: ExtractionConfig,
}

impl ExtractionService {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// 从页面中提取联系信息
    ///
    /// 电话和邮箱只在可见文本中查找；社交主页和人员同时查看文本与HTML；
    /// 地址优先使用文档结构
    pub fn extract(&self, page: &FetchedPage) -> ExtractedContacts {
        let phone_numbers = phones::extract_phone_numbers(&page.text, self.config.default_region);
        let emails = emails::extract_emails(&page.text);
        let social = social::extract_social_profiles(&page.text, &page.html);

        let combined = format!("{} {}", page.text, page.html);
        let persons = persons::extract_persons(
            &page.text,
            &page.html,
            &emails::extract_emails(&combined),
            &phones::extract_phone_numbers(&combined, self.config.default_region),
            self.config.max_persons,
        );

        let company_address = address::extract_company_address(
            &page.document(),
            &page.text,
            self.config.max_address_len,
        );

        ExtractedContacts {
            phone_numbers,
            emails,
            social,
            persons,
            company_address,
        }
    }
}

impl Default for ExtractionService {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

#[cfg(test)]
#[path = "extraction_test.rs"]
mod tests;
