// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::rate_limiting_service::DomainRateLimiter;
use crate::engines::traits::{FetchError, FetchedPage, PageFetcher};
use crate::utils::url_utils::domain_of;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// 获取路由器
///
/// 按顺序尝试各个获取器（静态请求在前，浏览器渲染在后），第一个成功的结果胜出。
/// 每次尝试前都要向限流器申请该域名的名额
pub struct FetchRouter {
    rate_limiter: Arc<DomainRateLimiter>,
    fetchers: Vec<Arc<dyn PageFetcher>>,
}

impl FetchRouter {
    /// 创建新的获取路由器
    ///
    /// # 参数
    ///
    /// * `rate_limiter` - 按域名限流器
    /// * `fetchers` - 获取器列表，按优先级排序
    pub fn new(rate_limiter: Arc<DomainRateLimiter>, fetchers: Vec<Arc<dyn PageFetcher>>) -> Self {
        Self {
            rate_limiter,
            fetchers,
        }
    }

    /// 静态获取优先，失败后使用浏览器渲染
    pub fn with_fallback(
        rate_limiter: Arc<DomainRateLimiter>,
        primary: Arc<dyn PageFetcher>,
        fallback: Arc<dyn PageFetcher>,
    ) -> Self {
        Self::new(rate_limiter, vec![primary, fallback])
    }

    pub fn rate_limiter(&self) -> &Arc<DomainRateLimiter> {
        &self.rate_limiter
    }

    /// 获取页面
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 第一个成功的获取结果
    /// * `Err(FetchError::Cancelled)` - 等待名额时任务被取消
    /// * `Err(FetchError::Exhausted)` - 所有获取器都失败
    pub async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, FetchError> {
        let domain = domain_of(url);

        for fetcher in &self.fetchers {
            let method = fetcher.method();
            if !self.rate_limiter.await_slot_or_cancel(&domain, cancel).await {
                return Err(FetchError::Cancelled);
            }

            match fetcher.fetch(url).await {
                Ok(page) => {
                    debug!(url, method = %method, "fetch succeeded");
                    metrics::counter!(
                        "contactrs_fetch_attempts_total",
                        "method" => method.as_str(),
                        "outcome" => "success"
                    )
                    .increment(1);
                    return Ok(page);
                }
                Err(e) => {
                    warn!(url, method = %method, error = %e, "fetch attempt failed");
                    metrics::counter!(
                        "contactrs_fetch_attempts_total",
                        "method" => method.as_str(),
                        "outcome" => "failure"
                    )
                    .increment(1);
                }
            }
        }

        Err(FetchError::Exhausted)
    }
}
