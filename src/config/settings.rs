// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、数据库、抓取、限流、缓存与提取等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置
    #[serde(default)]
    pub redis: RedisSettings,
    /// 任务并发配置
    pub scraping: ScrapingSettings,
    /// 按域名限流配置
    pub rate_limiting: RateLimitingSettings,
    /// 页面获取配置
    pub fetch: FetchSettings,
    /// 结果缓存配置
    pub cache: CacheSettings,
    /// 联系信息提取配置
    pub extraction: ExtractionSettings,
    /// 进度广播配置
    pub broadcast: BroadcastSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// Redis配置设置
///
/// 仅当缓存后端为 `redis` 时需要
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: Option<String>,
}

/// 任务并发配置
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapingSettings {
    /// 未指定时每个任务的并发上限
    pub default_max_threads: u32,
    /// 允许客户端请求的最大并发数
    pub max_threads_limit: u32,
}

/// 按域名限流配置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    /// 窗口内每个域名允许的请求数
    pub max_requests_per_domain: usize,
    /// 滑动窗口长度（秒）
    pub window_seconds: u64,
    /// 被拒绝时的重试间隔（毫秒）
    pub poll_interval_ms: u64,
}

impl RateLimitingSettings {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// 页面获取配置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// 静态请求总超时（秒）
    pub request_timeout_secs: u64,
    /// 静态请求连接超时（秒）
    pub connect_timeout_secs: u64,
    /// 浏览器导航超时（秒）
    pub navigation_timeout_secs: u64,
    /// 导航完成后等待动态内容的时间（毫秒）
    pub settle_delay_ms: u64,
    /// 最大重定向次数
    pub max_redirects: usize,
    /// 浏览器 User-Agent 池，为空时使用内置列表
    #[serde(default)]
    pub user_agents: Vec<String>,
    /// 远程 Chromium 调试地址，设置后不再本地启动浏览器
    pub chromium_remote_url: Option<String>,
}

/// 缓存存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Database,
    Redis,
    Memory,
}

/// 结果缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// 缓存存储后端
    pub backend: CacheBackend,
    /// 缓存保留天数
    pub retention_days: i64,
    /// 过期清理间隔（秒）
    pub sweep_interval_secs: u64,
}

impl CacheSettings {
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(self.retention_days)
    }
}

/// 联系信息提取配置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 无国际前缀号码的默认地区
    pub default_region: String,
    /// 每个页面最多提取的人员数
    pub max_persons: usize,
    /// 公司地址最大长度
    pub max_address_len: usize,
}

/// 进度广播配置
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastSettings {
    /// 每个订阅者的事件缓冲区大小
    pub subscriber_buffer: usize,
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: SocketAddr,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `CONTACTRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8001)?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("scraping.default_max_threads", 5)?
            .set_default("scraping.max_threads_limit", 25)?
            .set_default("rate_limiting.max_requests_per_domain", 2)?
            .set_default("rate_limiting.window_seconds", 60)?
            .set_default("rate_limiting.poll_interval_ms", 1000)?
            .set_default("fetch.request_timeout_secs", 30)?
            .set_default("fetch.connect_timeout_secs", 10)?
            .set_default("fetch.navigation_timeout_secs", 30)?
            .set_default("fetch.settle_delay_ms", 2000)?
            .set_default("fetch.max_redirects", 10)?
            .set_default("cache.backend", "database")?
            .set_default("cache.retention_days", 90)?
            .set_default("cache.sweep_interval_secs", 3600)?
            .set_default("extraction.default_region", "US")?
            .set_default("extraction.max_persons", 5)?
            .set_default("extraction.max_address_len", 200)?
            .set_default("broadcast.subscriber_buffer", 256)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CONTACTRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
