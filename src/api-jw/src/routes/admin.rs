use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use data_model_jw::db::DbPool;
use data_model_jw::models::{BlockCompanyError, BlockCompanyPayload, CreateMatchError, CreateMatchPayload};

/// POST /api/companies/block - Add a company to the ingestion denylist
pub async fn post_block_company(
    State(pool): State<DbPool>,
    Json(payload): Json<BlockCompanyPayload>,
) -> Result<impl IntoResponse, BlockCompanyError> {
    match store_jw::blocklist::block_company(&pool, payload).await {
        Ok(blocked) => Ok((StatusCode::CREATED, Json(blocked))),
        Err(store_jw::Error::AlreadyExists) => Err(BlockCompanyError::AlreadyBlocked),
        Err(e) => Err(BlockCompanyError::Unknown(e.to_string())),
    }
}

/// POST /api/matches - Record a candidate/job match
pub async fn post_create_match(
    State(pool): State<DbPool>,
    Json(payload): Json<CreateMatchPayload>,
) -> Result<impl IntoResponse, CreateMatchError> {
    match store_jw::matches::create_match(&pool, payload).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(store_jw::Error::RecordNotFound) => Err(CreateMatchError::JobNotFound),
        Err(e) => Err(CreateMatchError::Unknown(e.to_string())),
    }
}
