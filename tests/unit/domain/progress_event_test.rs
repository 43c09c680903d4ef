// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use contactrs::domain::models::progress_event::ProgressEvent;
use contactrs::domain::models::scrape_result::{ScrapeMethod, ScrapeResult, SocialProfiles};
use contactrs::domain::services::extraction::ExtractedContacts;
use uuid::Uuid;

#[test]
fn test_successful_url_complete_carries_flat_result() {
    // Given: 一个成功的抓取结果
    let job_id = Uuid::new_v4();
    let contacts = ExtractedContacts {
        emails: vec!["info@acme.io".into()],
        social: SocialProfiles {
            linkedin_url: "https://www.linkedin.com/company/acme".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    let result = ScrapeResult::succeeded(job_id, "https://acme.io", contacts, ScrapeMethod::Static);

    // When: 转为WebSocket帧
    let event = ProgressEvent::url_complete(job_id, "acme.io", 0, &result);
    let frame: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();

    // Then: 结果字段平铺在 data 中
    assert_eq!(frame["type"], "url_complete");
    assert_eq!(frame["url"], "acme.io");
    assert_eq!(frame["success"], true);
    assert_eq!(frame["data"]["email_address"], "info@acme.io");
    assert_eq!(
        frame["data"]["linkedin_url"],
        "https://www.linkedin.com/company/acme"
    );
    assert_eq!(frame["data"]["method"], "static");
    assert!(frame["error"].is_null());
}

#[test]
fn test_events_round_trip_through_json() {
    let job_id = Uuid::new_v4();
    let events = vec![
        ProgressEvent::url_start(job_id, "a.test", 0),
        ProgressEvent::url_error(job_id, "a.test", 0, "worker panicked"),
        ProgressEvent::job_error(job_id, "cancelled"),
    ];

    for event in events {
        let text = serde_json::to_string(&event).unwrap();
        let parsed: ProgressEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.job_id(), job_id);
    }
}
