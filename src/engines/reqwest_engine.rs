// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::ScrapeMethod;
use crate::engines::traits::{FetchError, FetchedPage, PageFetcher};
use crate::engines::user_agents::UserAgentPool;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::{redirect, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 静态获取配置
#[derive(Debug, Clone)]
pub struct StaticFetchConfig {
    /// 请求总超时
    pub request_timeout: Duration,
    /// 连接超时
    pub connect_timeout: Duration,
    /// 最大重定向次数
    pub max_redirects: usize,
}

impl Default for StaticFetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

/// 静态页面获取器
///
/// 基于reqwest的HTTP GET，只有200响应算成功
pub struct StaticFetcher {
    client: reqwest::Client,
    user_agents: Arc<UserAgentPool>,
}

impl StaticFetcher {
    /// 创建共享连接池的获取器
    ///
    /// # 参数
    ///
    /// * `config` - 超时与重定向配置
    /// * `user_agents` - User-Agent 池
    ///
    /// # 返回值
    ///
    /// * `Ok(StaticFetcher)` - 获取器实例
    /// * `Err(FetchError)` - 客户端构建失败
    pub fn new(config: &StaticFetchConfig, user_agents: Arc<UserAgentPool>) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            user_agents,
        })
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agents.pick(url))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(url, status = status.as_u16(), "static fetch returned non-200");
            return Err(FetchError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        Ok(FetchedPage::from_html(html, ScrapeMethod::Static))
    }

    fn method(&self) -> ScrapeMethod {
        ScrapeMethod::Static
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
