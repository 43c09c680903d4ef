// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use contactrs::domain::models::scrape_job::ScrapeJob;
use contactrs::domain::models::scrape_result::{
    PersonRecord, ScrapeMethod, ScrapeResult, SocialProfiles,
};
use contactrs::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use contactrs::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use contactrs::domain::services::extraction::ExtractedContacts;
use contactrs::infrastructure::database::connection::create_in_memory;
use contactrs::infrastructure::repositories::scrape_job_repo_impl::ScrapeJobRepositoryImpl;
use contactrs::infrastructure::repositories::scrape_result_repo_impl::ScrapeResultRepositoryImpl;
use std::sync::Arc;

#[tokio::test]
async fn test_results_are_stored_per_job() {
    let db = Arc::new(create_in_memory().await.unwrap());
    let jobs = ScrapeJobRepositoryImpl::new(db.clone());
    let results = ScrapeResultRepositoryImpl::new(db);

    let job = ScrapeJob::new(vec!["acme.io".into(), "down.test".into()], 2);
    let other = ScrapeJob::new(vec!["other.test".into()], 1);
    jobs.create(&job).await.unwrap();
    jobs.create(&other).await.unwrap();

    let contacts = ExtractedContacts {
        phone_numbers: vec!["+14155550132".into()],
        emails: vec!["sales@acme.io".into(), "ceo@acme.io".into()],
        social: SocialProfiles {
            github_url: "https://github.com/acme".into(),
            ..Default::default()
        },
        persons: vec![PersonRecord {
            name: "Jane Smith".into(),
            title: "CEO".into(),
            email: "ceo@acme.io".into(),
            phone: String::new(),
        }],
        company_address: "1200 Market Street, San Francisco, CA 94102".into(),
    };
    let success = ScrapeResult::succeeded(job.id, "https://acme.io", contacts, ScrapeMethod::Dynamic);
    let failure = ScrapeResult::failed(job.id, "https://down.test", "Failed to scrape with both methods");
    results.save(&success).await.unwrap();
    results.save(&failure).await.unwrap();
    results
        .save(&ScrapeResult::failed(other.id, "https://other.test", "x"))
        .await
        .unwrap();

    let stored = results.find_by_job_id(job.id).await.unwrap();
    assert_eq!(stored.len(), 2);

    let found = stored.iter().find(|r| r.success).unwrap();
    assert_eq!(found.phone_numbers, vec!["+14155550132".to_string()]);
    assert_eq!(found.email_address, "sales@acme.io");
    assert_eq!(found.social.github_url, "https://github.com/acme");
    assert_eq!(found.persons[0].name, "Jane Smith");
    assert_eq!(found.method, Some(ScrapeMethod::Dynamic));

    let missing = stored.iter().find(|r| !r.success).unwrap();
    assert_eq!(missing.method, None);
    assert_eq!(missing.error.as_deref(), Some("Failed to scrape with both methods"));
}
