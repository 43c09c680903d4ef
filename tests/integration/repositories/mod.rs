// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod scrape_cache_repo_test;
mod scrape_job_repo_test;
mod scrape_result_repo_test;
