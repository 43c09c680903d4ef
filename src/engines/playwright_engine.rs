// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::ScrapeMethod;
use crate::engines::traits::{FetchError, FetchedPage, PageFetcher};
use crate::engines::user_agents::UserAgentPool;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// 浏览器获取配置
#[derive(Debug, Clone)]
pub struct DynamicFetchConfig {
    /// 导航超时
    pub navigation_timeout: Duration,
    /// 导航完成后等待动态内容的时间
    pub settle_delay: Duration,
    /// 远程 Chromium 调试地址
    pub remote_url: Option<String>,
}

impl Default for DynamicFetchConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            remote_url: None,
        }
    }
}

/// 浏览器渲染获取器
///
/// 基于chromiumoxide。每次获取都启动一个独立的无头浏览器（独立的用户数据目录），
/// 结束后关闭，不在请求之间共享状态。配置了远程地址时改为连接远程实例，
/// 只关闭本次打开的页面
pub struct DynamicFetcher {
    config: DynamicFetchConfig,
    user_agents: Arc<UserAgentPool>,
}

impl DynamicFetcher {
    pub fn new(config: DynamicFetchConfig, user_agents: Arc<UserAgentPool>) -> Self {
        Self {
            config,
            user_agents,
        }
    }

    async fn launch(&self) -> Result<(Browser, Option<PathBuf>), FetchError> {
        let (browser, mut handler, profile_dir) = if let Some(url) = &self.config.remote_url {
            debug!("Connecting to remote Chrome instance at: {}", url);
            let (browser, handler) = Browser::connect(url.as_str())
                .await
                .map_err(|e| FetchError::Browser(format!("Failed to connect to remote Chrome: {}", e)))?;
            (browser, handler, None)
        } else {
            let profile_dir =
                std::env::temp_dir().join(format!("contactrs-chromium-{}", Uuid::new_v4()));
            let config = BrowserConfig::builder()
                .no_sandbox()
                .user_data_dir(&profile_dir)
                .window_size(1920, 1080)
                .request_timeout(self.config.navigation_timeout)
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(FetchError::Browser)?;
            let (browser, handler) = Browser::launch(config)
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            (browser, handler, Some(profile_dir))
        };

        // 浏览器事件必须持续被消费，否则所有CDP调用都会挂起
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok((browser, profile_dir))
    }

    /// 在新页面中渲染URL，无论成功与否都会关闭该页面
    async fn render(&self, browser: &Browser, url: &str) -> Result<FetchedPage, FetchError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        let outcome = self.capture(&page, url).await;
        if let Err(e) = page.close().await {
            warn!("Failed to close page: {}", e);
        }
        outcome
    }

    async fn capture(&self, page: &Page, url: &str) -> Result<FetchedPage, FetchError> {
        page.set_user_agent(self.user_agents.pick(url))
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        let navigation = async {
            page.goto(url)
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            Ok::<(), FetchError>(())
        };
        tokio::time::timeout(self.config.navigation_timeout, navigation)
            .await
            .map_err(|_| FetchError::Timeout)??;

        // 近似 network idle：导航结束后再等待一段时间让脚本完成渲染
        tokio::time::sleep(self.config.settle_delay).await;

        let html = page
            .content()
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        let text = page
            .evaluate("document.body ? document.body.innerText : ''")
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?
            .into_value::<String>()
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        Ok(FetchedPage::new(html, text, ScrapeMethod::Dynamic))
    }
}

#[async_trait]
impl PageFetcher for DynamicFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let (mut browser, profile_dir) = self.launch().await?;
        let outcome = self.render(&browser, url).await;

        // 远程浏览器是共享的，只有本地启动的实例需要关闭
        if let Some(dir) = profile_dir {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }
            if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
                debug!("Failed to remove browser profile {}: {}", dir.display(), e);
            }
        }

        outcome
    }

    fn method(&self) -> ScrapeMethod {
        ScrapeMethod::Dynamic
    }
}

#[cfg(test)]
#[path = "playwright_engine_test.rs"]
mod tests;
