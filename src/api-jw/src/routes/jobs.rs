use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};

use data_model_jw::db::DbPool;
use data_model_jw::models::{
    AppError, ClientFeedParams, ClientFeedResponse, ImportJobError, ImportJobPayload, JobSearchParams,
    JobSearchResponse, ScrapeStartedResponse,
};
use scrape_jw::{CycleConfig, HttpScrapeClient, run_cycle};
use store_jw::matches::DummyCandidateProfile;

/// Window for the client-notification feed.
const CLIENT_FEED_WINDOW_HOURS: i64 = 24;

/// GET /api/jobs/search - Paged text search over online postings
pub async fn get_search(
    State(pool): State<DbPool>,
    Query(params): Query<JobSearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let (items, total) = store_jw::queries::search_jobs(&pool, &params).await?;

    Ok((
        StatusCode::OK,
        Json(JobSearchResponse {
            items,
            page: params.page(),
            per_page: params.per_page(),
            total,
        }),
    ))
}

/// POST /api/jobs/import - Flag a job as imported into the ATS
pub async fn post_import(
    State(pool): State<DbPool>,
    Json(payload): Json<ImportJobPayload>,
) -> Result<impl IntoResponse, ImportJobError> {
    match store_jw::mark_imported(&pool, payload.job_id).await {
        Ok(job) => Ok((StatusCode::OK, Json(job))),
        Err(store_jw::Error::RecordNotFound) => Err(ImportJobError::NotFound),
        Err(e) => Err(ImportJobError::Unknown(e.to_string())),
    }
}

/// GET /api/jobs/client_feed - New postings from watched companies (last 24h)
pub async fn get_client_feed(
    State(pool): State<DbPool>,
    Query(params): Query<ClientFeedParams>,
) -> Result<impl IntoResponse, AppError> {
    let since = Utc::now() - Duration::hours(CLIENT_FEED_WINDOW_HOURS);
    let items = store_jw::queries::recent_jobs_from_companies(&pool, &params.company_names(), since).await?;

    Ok((StatusCode::OK, Json(ClientFeedResponse { items })))
}

/// GET /api/matches/suggest - Placeholder matching: shortlist for the stub profile
pub async fn get_suggested_matches(State(pool): State<DbPool>) -> Result<impl IntoResponse, AppError> {
    let jobs = store_jw::matches::suggest_jobs_for_candidate(&pool, &DummyCandidateProfile, 20).await?;
    Ok((StatusCode::OK, Json(jobs)))
}

/// GET /api/stats/dashboard - Row counts for the dashboard
pub async fn get_dashboard_stats(State(pool): State<DbPool>) -> Result<impl IntoResponse, AppError> {
    let stats = store_jw::queries::dashboard_stats(&pool).await?;
    Ok((StatusCode::OK, Json(stats)))
}

/// POST /api/scrape/start - Kick off a full scrape cycle in the background
///
/// The cycle can run for a long time, so the request is acknowledged
/// immediately and the work proceeds on a detached task.
pub async fn post_scrape_start(State(pool): State<DbPool>) -> impl IntoResponse {
    tokio::spawn(async move {
        let source = match HttpScrapeClient::from_env() {
            Ok(source) => source,
            Err(error) => {
                tracing::error!("Scrape cycle not started: {}", error);
                return;
            }
        };
        let config = CycleConfig::from_env();

        match run_cycle(&pool, &source, &config).await {
            Ok(outcome) => {
                tracing::info!(
                    "Background scrape cycle done: {} rows written, {} swept",
                    outcome.rows_written,
                    outcome.rows_swept
                );
            }
            Err(error) => {
                tracing::error!("Background scrape cycle failed: {}", error);
            }
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(ScrapeStartedResponse {
            message: "Scrape cycle started in the background. Follow the server logs for progress.".to_string(),
        }),
    )
}
