//! Candidate/job match records and the placeholder matching seam.

use diesel::prelude::*;
use diesel_async::AsyncConnection;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;

use data_model_jw::db::DbPool;
use data_model_jw::models::{CreateMatchPayload, JobMatch, JobStatus, NewJobMatch, ScrapedJob};
use data_model_jw::schema::{job_matches, scraped_jobs};

use crate::errors::Error;

/// Records a match between an ATS candidate and a scraped job.
/// Returns `Error::RecordNotFound` when the referenced job does not exist.
pub async fn create_match(pool: &DbPool, request: CreateMatchPayload) -> Result<JobMatch, Error> {
    let mut conn = pool.get().await?;

    let created = conn
        .transaction::<_, Error, _>(|conn| {
            async move {
                // The FK would reject the insert anyway; checking first lets
                // the caller distinguish "unknown job" from a write failure.
                let job_exists = scraped_jobs::table
                    .find(request.scraped_job_id)
                    .select(scraped_jobs::id)
                    .first::<i32>(conn)
                    .await
                    .optional()?;

                if job_exists.is_none() {
                    return Err(Error::RecordNotFound);
                }

                let job_match = diesel::insert_into(job_matches::table)
                    .values(&NewJobMatch {
                        candidate_id: request.candidate_id.clone(),
                        scraped_job_id: request.scraped_job_id,
                        match_status: request.match_status.clone(),
                    })
                    .get_result::<JobMatch>(conn)
                    .await?;

                Ok(job_match)
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(
        "Created match {} (candidate '{}' <-> job {})",
        created.id,
        created.candidate_id,
        created.scraped_job_id
    );
    Ok(created)
}

/// A candidate profile used to shortlist postings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub candidate_id: String,
    pub keywords: Vec<String>,
    pub location: Option<String>,
}

/// Where candidate profiles come from. The shipped implementation is a
/// hardcoded stand-in; a real ATS integration plugs in here.
pub trait CandidateProfileSource: Send + Sync {
    fn profile(&self) -> CandidateProfile;
}

/// Placeholder profile source with a fixed candidate.
pub struct DummyCandidateProfile;

impl CandidateProfileSource for DummyCandidateProfile {
    fn profile(&self) -> CandidateProfile {
        CandidateProfile {
            candidate_id: "dummy-candidate-001".to_string(),
            keywords: vec!["engineer".to_string(), "developer".to_string()],
            location: Some("Amsterdam".to_string()),
        }
    }
}

/// Shortlists online postings whose title matches any of the profile's
/// keywords, newest first. This is the placeholder matching operation: the
/// shortlist is what a real matcher would rank.
pub async fn suggest_jobs_for_candidate(
    pool: &DbPool,
    source: &dyn CandidateProfileSource,
    limit: i64,
) -> Result<Vec<ScrapedJob>, Error> {
    let profile = source.profile();
    let mut conn = pool.get().await?;

    let mut query = scraped_jobs::table.into_boxed();

    // Keyword alternatives first, then the status filter: successive
    // `filter` calls AND against the whole existing clause, so this yields
    // (kw1 OR kw2 OR ...) AND status = 'online'.
    let mut keywords = profile.keywords.iter();
    if let Some(first) = keywords.next() {
        query = query.filter(scraped_jobs::title.ilike(format!("%{}%", first)));
        for keyword in keywords {
            query = query.or_filter(scraped_jobs::title.ilike(format!("%{}%", keyword)));
        }
    }
    query = query.filter(scraped_jobs::status.eq(JobStatus::Online));

    let jobs = query
        .order(scraped_jobs::scraped_at.desc())
        .limit(limit)
        .load::<ScrapedJob>(&mut conn)
        .await?;

    tracing::debug!(
        "Shortlisted {} postings for candidate '{}'",
        jobs.len(),
        profile.candidate_id
    );
    Ok(jobs)
}
