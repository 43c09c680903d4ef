// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

/// 结构化数据和常见类名，按优先级排列
const ADDRESS_SELECTORS: [&str; 6] = [
    r#"[itemtype*="PostalAddress"]"#,
    ".address",
    "#address",
    r#"[class*="address"]"#,
    r#"[class*="location"]"#,
    ".contact-info",
];

const STREET_WORDS: [&str; 4] = ["street", "avenue", "road", "drive"];

static SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ADDRESS_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
});

/// 美式地址："123 Main Street, Springfield, IL 62701" 以及 "Springfield, IL 62701"
static ADDRESS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+\s+[A-Z][a-z]+\s+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln)[.,\s]+[A-Z][a-z]+[.,\s]+[A-Z]{2}\s+\d{5}",
        r"[A-Z][a-z]+[.,\s]+[A-Z]{2}\s+\d{5}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Failed to compile address regex"))
    .collect()
});

/// 提取公司地址
///
/// 先查找地址相关元素，文本超过10个字符且包含街道词才采用；
/// 否则在可见文本中匹配地址正则。结果截断到 `max_len` 个字符
pub fn extract_company_address(document: &Html, text: &str, max_len: usize) -> String {
    let from_markup = SELECTORS.iter().find_map(|selector| {
        document.select(selector).find_map(|element| {
            let content = element
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            let lowered = content.to_lowercase();
            (content.chars().count() > 10 && STREET_WORDS.iter().any(|w| lowered.contains(w)))
                .then_some(content)
        })
    });

    let address = from_markup.or_else(|| {
        ADDRESS_PATTERNS
            .iter()
            .find_map(|pattern| pattern.find(text).map(|m| m.as_str().to_string()))
    });

    address
        .map(|a| a.chars().take(max_len).collect())
        .unwrap_or_default()
}
