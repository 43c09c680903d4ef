// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// 限流配置
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// 窗口内每个域名允许的请求数
    pub max_requests_per_domain: usize,
    /// 滑动窗口长度
    pub window: Duration,
    /// 被拒绝后的重试间隔
    pub poll_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_domain: 2,
            window: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// 按域名的滑动窗口限流器
///
/// 每个域名保存窗口内的授予时间戳。`admit` 先剔除窗口外的时间戳，
/// 数量未达上限时记录本次授予。互斥锁只在 `admit` 内部持有，
/// 从不跨越 await。每经过一个窗口，`admit` 顺带删除整个窗口内
/// 没有授予记录的域名，长期运行时表的大小只取决于近期访问的域名数
pub struct DomainRateLimiter {
    config: RateLimitConfig,
    state: Mutex<LimiterState>,
}

struct LimiterState {
    windows: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

impl DomainRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LimiterState {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// 尝试为域名获取一个请求名额，不阻塞
    pub fn admit(&self, domain: &str) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock();
        if now.duration_since(state.last_sweep) >= self.config.window {
            let window = self.config.window;
            state.windows.retain(|_, stamps| {
                stamps
                    .back()
                    .is_some_and(|t| now.duration_since(*t) < window)
            });
            state.last_sweep = now;
        }
        let stamps = state.windows.entry(domain.to_string()).or_default();

        while let Some(oldest) = stamps.front() {
            if now.duration_since(*oldest) >= self.config.window {
                stamps.pop_front();
            } else {
                break;
            }
        }

        if stamps.len() < self.config.max_requests_per_domain {
            stamps.push_back(now);
            true
        } else {
            false
        }
    }

    /// 等待直到获得名额
    pub async fn await_slot(&self, domain: &str) {
        while !self.admit(domain) {
            debug!(domain, "rate limit reached, waiting for a free slot");
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// 等待名额，令牌被取消时立即返回 false
    pub async fn await_slot_or_cancel(&self, domain: &str, cancel: &CancellationToken) -> bool {
        loop {
            if cancel.is_cancelled() {
                return false;
            }
            if self.admit(domain) {
                return true;
            }
            debug!(domain, "rate limit reached, waiting for a free slot");
            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }

    /// 当前保存了时间戳的域名数
    pub fn tracked_domains(&self) -> usize {
        self.state.lock().windows.len()
    }

    /// 窗口内已授予的请求数
    pub fn in_window(&self, domain: &str) -> usize {
        let now = Instant::now();
        self.state
            .lock()
            .windows
            .get(domain)
            .map(|stamps| {
                stamps
                    .iter()
                    .filter(|t| now.duration_since(**t) < self.config.window)
                    .count()
            })
            .unwrap_or(0)
    }
}

impl Default for DomainRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
