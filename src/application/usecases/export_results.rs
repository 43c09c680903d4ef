// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_result::{PersonRecord, ScrapeResult};

/// 导出的人员列数上限
pub const EXPORT_PERSON_SLOTS: usize = 5;

/// 导出文件的列名
///
/// 固定的联系信息列之后依次是 `person_{name,title,email,phone}_1..5`
pub fn csv_header() -> Vec<String> {
    let mut header: Vec<String> = [
        "input_url",
        "phone_numbers",
        "email_address",
        "linkedin_url",
        "facebook_url",
        "instagram_url",
        "github_url",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();

    for slot in 1..=EXPORT_PERSON_SLOTS {
        for field in ["name", "title", "email", "phone"] {
            header.push(format!("person_{}_{}", field, slot));
        }
    }
    header
}

/// 将任务结果写成CSV，每个结果一行
///
/// 电话号码以 `", "` 连接；人员不足五个时对应列留空
pub fn results_to_csv(results: &[ScrapeResult]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(csv_header())?;

    let empty = PersonRecord::default();
    for result in results {
        let mut row = vec![
            result.url.clone(),
            result.phone_numbers.join(", "),
            result.email_address.clone(),
            result.social.linkedin_url.clone(),
            result.social.facebook_url.clone(),
            result.social.instagram_url.clone(),
            result.social.github_url.clone(),
        ];
        for slot in 0..EXPORT_PERSON_SLOTS {
            let person = result.persons.get(slot).unwrap_or(&empty);
            row.push(person.name.clone());
            row.push(person.title.clone());
            row.push(person.email.clone());
            row.push(person.phone.clone());
        }
        writer.write_record(&row)?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}
