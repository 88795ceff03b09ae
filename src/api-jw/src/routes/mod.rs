use axum::{
    Router,
    routing::{get, post},
};
use common_jw::health_check;
use tower_http::trace::TraceLayer;

use data_model_jw::db::DbPool;

pub mod admin;
pub mod jobs;

//
// Router
//

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/jobs/search", get(jobs::get_search))
        .route("/api/jobs/import", post(jobs::post_import))
        .route("/api/jobs/client_feed", get(jobs::get_client_feed))
        .route("/api/matches/suggest", get(jobs::get_suggested_matches))
        .route("/api/stats/dashboard", get(jobs::get_dashboard_stats))
        .route("/api/scrape/start", post(jobs::post_scrape_start))
        .route("/api/companies/block", post(admin::post_block_company))
        .route("/api/matches", post(admin::post_create_match))
        // Tracing middleware
        .layer(TraceLayer::new_for_http())
}
