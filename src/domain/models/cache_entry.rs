// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::scrape_result::ScrapeResult;

/// 结果缓存条目
///
/// 以规范化URL为键，仅在 `now < expires_at` 时视为有效
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub result: ScrapeResult,
    pub last_scraped: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(
        url: impl Into<String>,
        result: ScrapeResult,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            result,
            last_scraped: now,
            expires_at: now + retention,
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
