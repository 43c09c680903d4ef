// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use phonenumber::{country, Mode, PhoneNumber};
use regex::Regex;
use std::collections::BTreeSet;

/// 常见的号码排版形式
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\+?\d{1,3}[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
        r"\+?\d{10,15}",
        r"\(\d{3}\)\s?\d{3}[-.\s]?\d{4}",
        r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}",
        r"\+\d{1,3}\s?\d{1,14}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Failed to compile phone regex"))
    .collect()
});

const MIN_DIGITS: usize = 10;

/// 提取文本中的有效电话号码
///
/// 返回去重并排序的 E.164 号码，结果与输入中号码出现的顺序无关
pub fn extract_phone_numbers(text: &str, region: country::Id) -> Vec<String> {
    let mut numbers = BTreeSet::new();

    for pattern in PHONE_PATTERNS.iter() {
        for candidate in pattern.find_iter(text) {
            let cleaned: String = candidate
                .as_str()
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();

            if cleaned.chars().filter(char::is_ascii_digit).count() < MIN_DIGITS {
                continue;
            }

            if let Some(number) = parse_valid(&cleaned, region) {
                numbers.insert(number.format().mode(Mode::E164).to_string());
            }
        }
    }

    numbers.into_iter().collect()
}

/// 无 `+` 前缀时先按默认地区解析，失败或无效再按国际号码解析
fn parse_valid(cleaned: &str, region: country::Id) -> Option<PhoneNumber> {
    if cleaned.starts_with('+') {
        return phonenumber::parse(None, cleaned)
            .ok()
            .filter(|n| phonenumber::is_valid(n));
    }

    phonenumber::parse(Some(region), cleaned)
        .ok()
        .filter(|n| phonenumber::is_valid(n))
        .or_else(|| {
            phonenumber::parse(None, format!("+{}", cleaned))
                .ok()
                .filter(|n| phonenumber::is_valid(n))
        })
}
