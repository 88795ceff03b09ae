//! Read-only queries over the job store: search, notification feed, stats.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use data_model_jw::db::DbPool;
use data_model_jw::models::{DashboardStats, JobSearchParams, JobStatus, ScrapedJob};
use data_model_jw::schema::{blocked_entities, job_matches, scraped_jobs};

use crate::errors::Error;

/// Postings from watched companies first scraped within the window.
///
/// Only `scraped_at` is considered — a long-known posting that merely
/// reappeared does not show up, only genuinely new rows do.
pub async fn recent_jobs_from_companies(
    pool: &DbPool,
    companies: &[String],
    since: DateTime<Utc>,
) -> Result<Vec<ScrapedJob>, Error> {
    if companies.is_empty() {
        return Ok(Vec::new());
    }

    let mut conn = pool.get().await?;

    let jobs = scraped_jobs::table
        .filter(scraped_jobs::company_name.eq_any(companies))
        .filter(scraped_jobs::scraped_at.ge(since))
        .order(scraped_jobs::scraped_at.desc())
        .load::<ScrapedJob>(&mut conn)
        .await?;

    Ok(jobs)
}

/// Paged text search over online postings, newest-scraped first.
/// Returns the page items and the total match count.
pub async fn search_jobs(pool: &DbPool, params: &JobSearchParams) -> Result<(Vec<ScrapedJob>, i64), Error> {
    let mut conn = pool.get().await?;

    let mut query = scraped_jobs::table
        .filter(scraped_jobs::status.eq(JobStatus::Online))
        .into_boxed();
    let mut count_query = scraped_jobs::table
        .filter(scraped_jobs::status.eq(JobStatus::Online))
        .into_boxed();

    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q);
        query = query.filter(scraped_jobs::title.ilike(pattern.clone()));
        count_query = count_query.filter(scraped_jobs::title.ilike(pattern));
    }

    if let Some(location) = params.location.as_deref().filter(|l| !l.is_empty()) {
        let pattern = format!("%{}%", location);
        query = query.filter(scraped_jobs::location.ilike(pattern.clone()));
        count_query = count_query.filter(scraped_jobs::location.ilike(pattern));
    }

    let total = count_query.count().get_result::<i64>(&mut conn).await?;

    let items = query
        .order(scraped_jobs::scraped_at.desc())
        .limit(params.per_page())
        .offset(params.offset())
        .load::<ScrapedJob>(&mut conn)
        .await?;

    Ok((items, total))
}

/// Row counts for the dashboard endpoint.
pub async fn dashboard_stats(pool: &DbPool) -> Result<DashboardStats, Error> {
    let mut conn = pool.get().await?;

    let total_jobs = scraped_jobs::table.count().get_result::<i64>(&mut conn).await?;

    let online_jobs = scraped_jobs::table
        .filter(scraped_jobs::status.eq(JobStatus::Online))
        .count()
        .get_result::<i64>(&mut conn)
        .await?;

    let deleted_jobs = scraped_jobs::table
        .filter(scraped_jobs::status.eq(JobStatus::Deleted))
        .count()
        .get_result::<i64>(&mut conn)
        .await?;

    let imported_to_ats = scraped_jobs::table
        .filter(scraped_jobs::is_imported_to_ats.eq(true))
        .count()
        .get_result::<i64>(&mut conn)
        .await?;

    let blocked_companies = blocked_entities::table
        .filter(blocked_entities::entity_type.eq("company"))
        .count()
        .get_result::<i64>(&mut conn)
        .await?;

    let job_matches = job_matches::table.count().get_result::<i64>(&mut conn).await?;

    Ok(DashboardStats {
        total_jobs,
        online_jobs,
        deleted_jobs,
        imported_to_ats,
        blocked_companies,
        job_matches,
    })
}
