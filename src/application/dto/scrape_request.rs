// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 单个URL抓取请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SingleScrapeRequestDto {
    /// 要抓取的URL，可省略协议
    #[validate(length(min = 1, message = "URL cannot be empty"))]
    pub url: String,
    /// 并发上限 (1-25)
    #[validate(range(min = 1, max = 25))]
    pub max_threads: Option<u32>,
}

/// 批量抓取请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct BulkScrapeRequestDto {
    /// URL列表，空白项会被忽略
    #[validate(length(min = 1, message = "URL list cannot be empty"))]
    pub urls: Vec<String>,
    #[validate(range(min = 1, max = 25))]
    pub max_threads: Option<u32>,
}
