//! Write path for the scraped-jobs lifecycle: upsert, import flag, sweep, purge.
//!
//! Every operation runs in its own transactional scope against a pooled
//! connection; nothing here spans operations. The store owns all writes to
//! `scraped_jobs` — other crates only read.

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use data_model_jw::db::DbPool;
use data_model_jw::models::{JobStatus, NewScrapedJob, RawJobPosting, ScrapedJob};
use data_model_jw::schema::scraped_jobs;

use crate::errors::Error;

/// Days a deleted posting is kept before it is permanently purged,
/// measured from `last_seen_at`.
pub const RETENTION_DAYS: i64 = 7;

/// Inserts a batch of raw postings observed at `seen_at`.
///
/// A posting whose `job_url` already exists is not duplicated: only its
/// `last_seen_at` and `status` are refreshed — previously stored title,
/// description, and the other descriptive fields stay as first scraped.
/// `scraped_at` is never touched after the initial insert.
///
/// The whole batch is written in one statement, so a failure leaves the
/// table unchanged. Returns the number of rows inserted plus updated.
pub async fn upsert_batch(pool: &DbPool, postings: Vec<RawJobPosting>, seen_at: DateTime<Utc>) -> Result<usize, Error> {
    if postings.is_empty() {
        return Ok(0);
    }

    let mut conn = pool.get().await?;

    // Postgres rejects a multi-row upsert that touches the same row twice,
    // so collapse repeated URLs within the batch (first occurrence wins).
    let mut seen_urls = std::collections::HashSet::new();
    let rows: Vec<NewScrapedJob> = postings
        .into_iter()
        .filter(|p| seen_urls.insert(p.job_url.clone()))
        .map(|p| NewScrapedJob::from_raw(p, seen_at))
        .collect();

    let written = diesel::insert_into(scraped_jobs::table)
        .values(&rows)
        .on_conflict(scraped_jobs::job_url)
        .do_update()
        .set((
            scraped_jobs::last_seen_at.eq(seen_at),
            scraped_jobs::status.eq(JobStatus::Online),
        ))
        .execute(&mut conn)
        .await?;

    tracing::debug!("Upserted batch: {} rows written ({} submitted)", written, rows.len());
    Ok(written)
}

/// Flags one job as imported into the ATS. Idempotent: re-flagging an
/// already-imported job changes nothing else. Returns the updated row, or
/// `Error::RecordNotFound` when no job has the given id.
pub async fn mark_imported(pool: &DbPool, job_id: i32) -> Result<ScrapedJob, Error> {
    let mut conn = pool.get().await?;

    let job = diesel::update(scraped_jobs::table.find(job_id))
        .set(scraped_jobs::is_imported_to_ats.eq(true))
        .get_result::<ScrapedJob>(&mut conn)
        .await?;

    tracing::info!("Marked job {} ('{}') as imported to ATS", job.id, job.job_url);
    Ok(job)
}

/// Marks every online job not observed since `cycle_started_at` as deleted.
///
/// Rows inserted or refreshed during the cycle carry `last_seen_at` at or
/// after the cycle start, so they are untouched. Re-running with the same
/// boundary affects zero additional rows. Returns the transition count.
pub async fn sweep_unseen(pool: &DbPool, cycle_started_at: DateTime<Utc>) -> Result<usize, Error> {
    let mut conn = pool.get().await?;

    let transitioned = diesel::update(
        scraped_jobs::table
            .filter(scraped_jobs::status.eq(JobStatus::Online))
            .filter(scraped_jobs::last_seen_at.lt(cycle_started_at)),
    )
    .set(scraped_jobs::status.eq(JobStatus::Deleted))
    .execute(&mut conn)
    .await?;

    tracing::info!(
        "Sweep: {} postings unseen since {} marked as deleted",
        transitioned,
        cycle_started_at
    );
    Ok(transitioned)
}

/// Permanently removes deleted jobs whose `last_seen_at` is older than the
/// retention window. Irreversible. Online jobs are never purged, no matter
/// how old. Returns the number of rows deleted.
pub async fn purge_expired(pool: &DbPool, now: DateTime<Utc>) -> Result<usize, Error> {
    let mut conn = pool.get().await?;

    let cutoff = now - Duration::days(RETENTION_DAYS);

    let purged = diesel::delete(
        scraped_jobs::table
            .filter(scraped_jobs::status.eq(JobStatus::Deleted))
            .filter(scraped_jobs::last_seen_at.lt(cutoff)),
    )
    .execute(&mut conn)
    .await?;

    tracing::info!("Purge: {} postings removed (deleted before {})", purged, cutoff);
    Ok(purged)
}
