// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use scraper::Html;
use thiserror::Error;

use crate::domain::models::scrape_result::ScrapeMethod;

/// 页面获取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 非200响应
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    /// 浏览器启动、导航或读取失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 任务已取消
    #[error("Job cancelled")]
    Cancelled,
    /// 所有获取方式都失败
    #[error("Failed to scrape with both methods")]
    Exhausted,
}

/// 获取到的页面
///
/// `html` 为完整文档，`text` 为可见文本（静态获取时剔除脚本和样式）
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub text: String,
    pub method: ScrapeMethod,
}

impl FetchedPage {
    pub fn new(html: impl Into<String>, text: impl Into<String>, method: ScrapeMethod) -> Self {
        Self {
            html: html.into(),
            text: text.into(),
            method,
        }
    }

    /// 由HTML构造页面，可见文本从文档中计算
    pub fn from_html(html: impl Into<String>, method: ScrapeMethod) -> Self {
        let html = html.into();
        let text = visible_text(&Html::parse_document(&html));
        Self { html, text, method }
    }

    /// 解析后的可查询文档
    ///
    /// `Html` 不是 `Send`，只能在同步代码中使用，不要跨越 await 持有
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// 拼接文档中不属于 script/style 等元素的文本节点
pub fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor.value().as_element().is_some_and(|element| {
                matches!(element.name(), "script" | "style" | "noscript" | "template")
            })
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}

/// 页面获取器特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 获取页面，任何失败都以 `FetchError` 返回
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// 获取方式
    fn method(&self) -> ScrapeMethod;
}
