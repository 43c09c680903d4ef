// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::scrape_result::PersonRecord;

/// "First Last - Title" 或 "First Last, Title"，职位到句末或行末为止
static NAME_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][a-z]+ [A-Z][a-z]+)\s*[-,]\s*([A-Z][^.!?]*?)(?:[.!?]|\n|$)")
        .expect("Failed to compile name/title regex")
});

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<h[1-6][^>]*>([^<]+)</h[1-6]>").expect("Failed to compile heading regex")
});

/// 标题中超过这个词数的内容不当作人名
const MAX_HEADING_NAME_WORDS: usize = 4;

/// 提取人员信息
///
/// 邮箱和电话按位置回填：第 i 个人员取第 i 个邮箱和第 i 个电话，
/// 这是尽力而为的启发式规则，不保证对应关系正确
pub fn extract_persons(
    text: &str,
    html: &str,
    emails: &[String],
    phones: &[String],
    max_persons: usize,
) -> Vec<PersonRecord> {
    let content = format!("{} {}", text, html);
    let mut persons: Vec<PersonRecord> = Vec::new();

    let candidates = NAME_TITLE
        .captures_iter(&content)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let title = caps.get(2)?.as_str();
            Some((name.to_string(), collapse_whitespace(title)))
        })
        .chain(HEADING.captures_iter(&content).filter_map(|caps| {
            let name = collapse_whitespace(caps.get(1)?.as_str());
            (name.split_whitespace().count() <= MAX_HEADING_NAME_WORDS)
                .then_some((name, String::new()))
        }));

    for (name, title) in candidates {
        if persons.len() >= max_persons {
            break;
        }
        let name = name.trim().to_string();
        if !is_plausible_name(&name) || persons.iter().any(|p| p.name == name) {
            continue;
        }

        let position = persons.len();
        persons.push(PersonRecord {
            name,
            title,
            email: emails.get(position).cloned().unwrap_or_default(),
            phone: phones.get(position).cloned().unwrap_or_default(),
        });
    }

    persons
}

/// 至少两个首字母大写的词，且长度大于3
fn is_plausible_name(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    name.len() > 3
        && words.len() >= 2
        && words
            .iter()
            .all(|w| w.chars().next().is_some_and(char::is_uppercase))
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
