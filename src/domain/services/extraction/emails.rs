// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("Failed to compile email regex")
});

/// 占位用的示例域名
const PLACEHOLDER_DOMAINS: [&str; 4] = ["example.com", "test.com", "domain.com", "email.com"];

/// 形如 `logo@2x.png` 的图片文件名
const IMAGE_SUFFIXES: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

/// 提取邮箱地址
///
/// 统一小写，保留首次出现的顺序
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut emails: Vec<String> = Vec::new();

    for found in EMAIL_PATTERN.find_iter(text) {
        let email = found.as_str().to_lowercase();
        let Some((_, domain)) = email.rsplit_once('@') else {
            continue;
        };
        if PLACEHOLDER_DOMAINS.contains(&domain)
            || IMAGE_SUFFIXES.iter().any(|suffix| domain.ends_with(suffix))
        {
            continue;
        }
        if !emails.contains(&email) {
            emails.push(email);
        }
    }

    emails
}
