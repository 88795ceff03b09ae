//! Integration tests for the scrape cycle against the test database
//!
//! Exercises the orchestration contract: batches land in the store, the
//! blocklist is applied before upsert, and the reconciliation sweep runs
//! even when every query fails.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use data_model_jw::{
    models::{JobStatus, RawJobPosting},
    test_helpers::{clean_test_db, get_job_by_url, insert_blocked_company, insert_test_job, test_db_pool},
};
use tokio::sync::Mutex;

use scrape_jw::{CycleConfig, Error, ScrapeSource, Site, run_cycle};

static TEST_MUTEX: Mutex<()> = Mutex::const_new(());

/// Source returning the same fixed page for every query.
struct StaticSource {
    postings: Vec<RawJobPosting>,
}

#[async_trait]
impl ScrapeSource for StaticSource {
    async fn fetch(&self, _: Site, _: &str, _: &str, _: u32) -> Result<Vec<RawJobPosting>, Error> {
        Ok(self.postings.clone())
    }
}

/// Source that fails every query, as if the board were unreachable.
struct FailingSource;

#[async_trait]
impl ScrapeSource for FailingSource {
    async fn fetch(&self, _: Site, _: &str, _: &str, _: u32) -> Result<Vec<RawJobPosting>, Error> {
        Err(Error::MissingConfig("simulated outage".to_string()))
    }
}

fn posting(url: &str, title: &str, company: &str) -> RawJobPosting {
    RawJobPosting {
        job_url: url.to_string(),
        title: Some(title.to_string()),
        company_name: Some(company.to_string()),
        location: Some("Amsterdam".to_string()),
        description: Some("A role".to_string()),
        job_type: None,
        source: Some("indeed".to_string()),
        posted_at: None,
    }
}

/// One-site one-pair config pointing at a real keywords file on disk, with
/// throttling disabled.
fn test_config(name: &str) -> CycleConfig {
    let dir = std::env::temp_dir().join("jw-cycle-tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.json", name));
    std::fs::write(&path, r#"{"locations": ["Amsterdam"], "job_titles": ["Engineer"]}"#).unwrap();

    CycleConfig {
        sites: vec![Site::Indeed],
        results_wanted: 5,
        keywords_file: path,
        throttle_seconds: (0.0, 0.0),
    }
}

#[tokio::test]
async fn test_cycle_upserts_and_sweeps() {
    let _guard = TEST_MUTEX.lock().await;
    let pool = test_db_pool().await;
    clean_test_db(&pool).await;

    // Online before the cycle, not in this cycle's results: must get swept
    let stale = insert_test_job(
        &pool,
        "https://jobs.example.com/stale",
        "Acme",
        Utc::now() - Duration::hours(3),
        JobStatus::Online,
    )
    .await;

    let source = StaticSource {
        postings: vec![posting("https://jobs.example.com/c1", "Engineer", "Acme")],
    };

    let outcome = run_cycle(&pool, &source, &test_config("upserts-and-sweeps")).await.unwrap();

    assert_eq!(outcome.queries_attempted, 1);
    assert_eq!(outcome.queries_failed, 0);
    assert_eq!(outcome.rows_written, 1);
    assert_eq!(outcome.rows_swept, 1);
    assert!(!outcome.aborted);

    let fresh = get_job_by_url(&pool, "https://jobs.example.com/c1").await.unwrap();
    assert_eq!(fresh.status, JobStatus::Online);

    let stale = data_model_jw::test_helpers::get_job_by_id(&pool, stale.id).await.unwrap();
    assert_eq!(stale.status, JobStatus::Deleted);
}

#[tokio::test]
async fn test_cycle_blocklisted_companies_never_reach_the_store() {
    let _guard = TEST_MUTEX.lock().await;
    let pool = test_db_pool().await;
    clean_test_db(&pool).await;

    insert_blocked_company(&pool, "Spammy Recruiters BV").await;

    let source = StaticSource {
        postings: vec![
            posting("https://jobs.example.com/ok", "Engineer", "Acme"),
            posting("https://jobs.example.com/blocked", "Engineer", "Spammy Recruiters BV"),
        ],
    };

    let outcome = run_cycle(&pool, &source, &test_config("blocklist")).await.unwrap();
    assert_eq!(outcome.rows_written, 1);

    assert!(get_job_by_url(&pool, "https://jobs.example.com/ok").await.is_some());
    assert!(get_job_by_url(&pool, "https://jobs.example.com/blocked").await.is_none());
}

#[tokio::test]
async fn test_cycle_sweeps_even_when_every_query_fails() {
    let _guard = TEST_MUTEX.lock().await;
    let pool = test_db_pool().await;
    clean_test_db(&pool).await;

    let stale = insert_test_job(
        &pool,
        "https://jobs.example.com/orphan",
        "Acme",
        Utc::now() - Duration::hours(3),
        JobStatus::Online,
    )
    .await;

    let outcome = run_cycle(&pool, &FailingSource, &test_config("all-failing")).await.unwrap();

    assert_eq!(outcome.queries_failed, outcome.queries_attempted);
    assert_eq!(outcome.rows_written, 0);
    // The sweep still ran: the stale posting is reconciled
    assert_eq!(outcome.rows_swept, 1);

    let stale = data_model_jw::test_helpers::get_job_by_id(&pool, stale.id).await.unwrap();
    assert_eq!(stale.status, JobStatus::Deleted);
}

#[tokio::test]
async fn test_cycle_missing_keywords_aborts_before_any_work() {
    let _guard = TEST_MUTEX.lock().await;
    let pool = test_db_pool().await;
    clean_test_db(&pool).await;

    let untouched = insert_test_job(
        &pool,
        "https://jobs.example.com/untouched",
        "Acme",
        Utc::now() - Duration::hours(3),
        JobStatus::Online,
    )
    .await;

    let config = CycleConfig {
        keywords_file: PathBuf::from("/nonexistent/keywords.json"),
        throttle_seconds: (0.0, 0.0),
        ..CycleConfig::default()
    };

    let result = run_cycle(&pool, &FailingSource, &config).await;
    assert!(matches!(result, Err(Error::KeywordsIo(_))));

    // Aborted before the cycle started: no sweep happened
    let untouched = data_model_jw::test_helpers::get_job_by_id(&pool, untouched.id).await.unwrap();
    assert_eq!(untouched.status, JobStatus::Online);
}

#[tokio::test]
async fn test_cycle_dedups_within_a_page() {
    let _guard = TEST_MUTEX.lock().await;
    let pool = test_db_pool().await;
    clean_test_db(&pool).await;

    let mut first = posting("https://jobs.example.com/dup1", "Engineer", "Acme");
    first.description = Some("kept".to_string());
    // Same (title, company, location) triple under a different URL
    let mut second = posting("https://jobs.example.com/dup2", "Engineer", "Acme");
    second.description = Some("dropped".to_string());

    let source = StaticSource {
        postings: vec![first, second],
    };

    let outcome = run_cycle(&pool, &source, &test_config("dedup")).await.unwrap();
    assert_eq!(outcome.rows_written, 1);

    let stored = get_job_by_url(&pool, "https://jobs.example.com/dup1").await.unwrap();
    assert_eq!(stored.description.as_deref(), Some("kept"));
    assert!(get_job_by_url(&pool, "https://jobs.example.com/dup2").await.is_none());
}
