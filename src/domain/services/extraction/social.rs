// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::scrape_result::SocialProfiles;

/// URL路径允许的字符
const PATH_CHARS: &str = r"[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=]+";

/// 每个平台按顺序尝试：完整URL，然后是裸域名路径
fn platform_patterns(host: &str, path_prefix: &str) -> Vec<Regex> {
    [
        format!(r"(?i)https?://(?:www\.)?{host}/{path_prefix}{PATH_CHARS}"),
        format!(r"(?i){host}/{path_prefix}{PATH_CHARS}"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Failed to compile social profile regex"))
    .collect()
}

static LINKEDIN: Lazy<Vec<Regex>> =
    Lazy::new(|| platform_patterns(r"linkedin\.com", "(?:company|in)/"));
static FACEBOOK: Lazy<Vec<Regex>> = Lazy::new(|| platform_patterns(r"facebook\.com", ""));
static INSTAGRAM: Lazy<Vec<Regex>> = Lazy::new(|| platform_patterns(r"instagram\.com", ""));
static GITHUB: Lazy<Vec<Regex>> = Lazy::new(|| platform_patterns(r"github\.com", ""));

/// 提取社交主页链接
///
/// 在 `text + " " + html` 中查找，每个平台取第一个匹配
pub fn extract_social_profiles(text: &str, html: &str) -> SocialProfiles {
    let content = format!("{} {}", text, html);

    SocialProfiles {
        linkedin_url: first_match(&LINKEDIN, &content),
        facebook_url: first_match(&FACEBOOK, &content),
        instagram_url: first_match(&INSTAGRAM, &content),
        github_url: first_match(&GITHUB, &content),
    }
}

fn first_match(patterns: &[Regex], content: &str) -> String {
    patterns
        .iter()
        .find_map(|pattern| pattern.find(content))
        .map(|found| {
            let url = found.as_str();
            if url.to_ascii_lowercase().starts_with("http") {
                url.to_string()
            } else {
                format!("https://{}", url)
            }
        })
        .unwrap_or_default()
}
