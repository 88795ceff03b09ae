use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::SqlType;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Write;

// SQL type definitions for custom enums
// Note: These types use snake_case to match PostgreSQL type names
#[allow(non_camel_case_types)]
#[derive(SqlType, diesel::query_builder::QueryId, Debug, Clone, Copy)]
#[diesel(postgres_type(name = "job_status"))]
pub struct Job_status;

// JobStatus enum
/// Presence state of a scraped posting on its source board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Job_status)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Observed in the most recent scrape cycle that touched it
    Online,
    /// Absent from the latest cycle; kept until the retention window expires
    Deleted,
}

impl JobStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl ToSql<Job_status, Pg> for JobStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let s = match self {
            JobStatus::Online => "online",
            JobStatus::Deleted => "deleted",
        };
        out.write_all(s.as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Job_status, Pg> for JobStatus {
    fn from_sql(bytes: PgValue) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"online" => Ok(JobStatus::Online),
            b"deleted" => Ok(JobStatus::Deleted),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

// scraped_jobs table model (database representation)
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::scraped_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScrapedJob {
    pub id: i32,
    pub job_url: String,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub source: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub status: JobStatus,
    pub is_imported_to_ats: bool,
}

/// Insertable form of a scraped job. The id is assigned by the database.
///
/// `scraped_at` and `last_seen_at` are both set to the observation time on
/// first insert; only `last_seen_at` moves afterwards.
#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::scraped_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewScrapedJob {
    pub job_url: String,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub source: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub status: JobStatus,
    pub is_imported_to_ats: bool,
}

/// One raw posting as returned by a scrape source, before persistence.
///
/// Field aliases follow the jobspy wire names so a source response
/// deserializes directly (`job_posting_url` -> `job_url`, `company` ->
/// `company_name`, `site` -> `source`, `date_posted` -> `posted_at`).
/// Everything except the URL may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawJobPosting {
    #[serde(alias = "job_posting_url")]
    pub job_url: String,
    pub title: Option<String>,
    #[serde(alias = "company")]
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub job_type: Option<String>,
    #[serde(alias = "site")]
    pub source: Option<String>,
    #[serde(alias = "date_posted")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl NewScrapedJob {
    /// Build an insertable row from a raw posting observed at `seen_at`.
    /// New rows always start online and not yet imported.
    pub fn from_raw(raw: RawJobPosting, seen_at: DateTime<Utc>) -> Self {
        NewScrapedJob {
            job_url: raw.job_url,
            title: raw.title,
            company_name: raw.company_name,
            location: raw.location,
            description: raw.description,
            job_type: raw.job_type,
            source: raw.source,
            posted_at: raw.posted_at,
            scraped_at: seen_at,
            last_seen_at: seen_at,
            status: JobStatus::Online,
            is_imported_to_ats: false,
        }
    }
}

// job_matches table model (database representation)
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::job_matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobMatch {
    pub id: i32,
    pub candidate_id: String,
    pub scraped_job_id: i32,
    pub match_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::job_matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewJobMatch {
    pub candidate_id: String,
    pub scraped_job_id: i32,
    pub match_status: String,
}

// blocked_entities table model (database representation)
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::blocked_entities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BlockedEntity {
    pub id: i32,
    pub entity_name: String,
    pub entity_type: String,
    pub reason: Option<String>,
    pub blocked_by_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::blocked_entities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBlockedEntity {
    pub entity_name: String,
    pub entity_type: String,
    pub reason: Option<String>,
    pub blocked_by_user_id: Option<String>,
}

// API Payload Types

/// Input payload for POST /api/companies/block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockCompanyPayload {
    pub entity_name: String,
    pub blocked_by_user_id: String,
    pub reason: Option<String>,
}

/// Input payload for POST /api/matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchPayload {
    pub candidate_id: String,
    pub scraped_job_id: i32,
    pub match_status: String,
}

/// Input payload for POST /api/jobs/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJobPayload {
    pub job_id: i32,
}

/// Query parameters for GET /api/jobs/search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSearchParams {
    pub q: Option<String>,
    pub location: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl JobSearchParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to [1, 100].
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

/// Query parameters for GET /api/jobs/client_feed
///
/// `companies` is a comma-separated list of company names to watch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFeedParams {
    pub companies: String,
}

impl ClientFeedParams {
    pub fn company_names(&self) -> Vec<String> {
        self.companies
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

// API Response Types

/// Response payload for GET /api/jobs/search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSearchResponse {
    pub items: Vec<ScrapedJob>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// Response payload for GET /api/jobs/client_feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFeedResponse {
    pub items: Vec<ScrapedJob>,
}

/// Response payload for GET /api/stats/dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub online_jobs: i64,
    pub deleted_jobs: i64,
    pub imported_to_ats: i64,
    pub blocked_companies: i64,
    pub job_matches: i64,
}

/// Response payload for POST /api/scrape/start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeStartedResponse {
    pub message: String,
}

// API Error Types

/// Error for POST /api/jobs/import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ImportJobError {
    /// No scraped job with the given id
    #[serde(rename = "not_found")]
    NotFound,
    /// Unknown error occurred
    #[serde(rename = "unknown")]
    Unknown(String),
}

/// Error for POST /api/companies/block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum BlockCompanyError {
    /// The company is already on the blocklist
    #[serde(rename = "already_blocked")]
    AlreadyBlocked,
    /// Unknown error occurred
    #[serde(rename = "unknown")]
    Unknown(String),
}

/// Error for POST /api/matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum CreateMatchError {
    /// The referenced scraped job does not exist
    #[serde(rename = "job_not_found")]
    JobNotFound,
    /// Unknown error occurred
    #[serde(rename = "unknown")]
    Unknown(String),
}

pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": self.0.to_string()
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// ImportJobError

impl IntoResponse for ImportJobError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ImportJobError::NotFound => StatusCode::NOT_FOUND,
            ImportJobError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

// BlockCompanyError

impl IntoResponse for BlockCompanyError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            BlockCompanyError::AlreadyBlocked => StatusCode::CONFLICT,
            BlockCompanyError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

// CreateMatchError

impl IntoResponse for CreateMatchError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            CreateMatchError::JobNotFound => StatusCode::NOT_FOUND,
            CreateMatchError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&JobStatus::Online).unwrap(), "\"online\"");
        assert_eq!(serde_json::to_string(&JobStatus::Deleted).unwrap(), "\"deleted\"");

        let parsed: JobStatus = serde_json::from_str("\"deleted\"").unwrap();
        assert_eq!(parsed, JobStatus::Deleted);
        assert!(!parsed.is_online());
    }

    #[test]
    fn test_new_scraped_job_carries_observation_time() {
        let now = Utc::now();
        let job = NewScrapedJob {
            job_url: "https://boards.example.com/jobs/1".to_string(),
            title: Some("Data Engineer".to_string()),
            company_name: Some("Acme".to_string()),
            location: Some("Utrecht".to_string()),
            description: None,
            job_type: None,
            source: Some("indeed".to_string()),
            posted_at: None,
            scraped_at: now,
            last_seen_at: now,
            status: JobStatus::Online,
            is_imported_to_ats: false,
        };

        assert_eq!(job.scraped_at, job.last_seen_at);
        assert_eq!(job.status, JobStatus::Online);
        assert!(!job.is_imported_to_ats);
    }

    #[test]
    fn test_raw_posting_accepts_source_wire_names() {
        let raw: RawJobPosting = serde_json::from_value(json!({
            "job_posting_url": "https://nl.indeed.com/viewjob?jk=abc123",
            "title": "Backend Developer",
            "company": "Globex",
            "location": "Rotterdam",
            "site": "indeed"
        }))
        .unwrap();

        assert_eq!(raw.job_url, "https://nl.indeed.com/viewjob?jk=abc123");
        assert_eq!(raw.company_name.as_deref(), Some("Globex"));
        assert_eq!(raw.source.as_deref(), Some("indeed"));
        assert_eq!(raw.description, None);
    }

    #[test]
    fn test_from_raw_sets_lifecycle_fields() {
        let raw = RawJobPosting {
            job_url: "https://boards.example.com/jobs/2".to_string(),
            title: Some("Data Scientist".to_string()),
            company_name: Some("Initech".to_string()),
            location: None,
            description: None,
            job_type: None,
            source: Some("linkedin".to_string()),
            posted_at: None,
        };

        let seen_at = Utc::now();
        let row = NewScrapedJob::from_raw(raw, seen_at);

        assert_eq!(row.scraped_at, seen_at);
        assert_eq!(row.last_seen_at, seen_at);
        assert_eq!(row.status, JobStatus::Online);
        assert!(!row.is_imported_to_ats);
    }

    #[test]
    fn test_search_params_defaults_and_clamping() {
        let params = JobSearchParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 20);
        assert_eq!(params.offset(), 0);

        let params = JobSearchParams {
            q: Some("engineer".to_string()),
            location: None,
            page: Some(0),
            per_page: Some(5000),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), 100);

        let params = JobSearchParams {
            q: None,
            location: None,
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn test_client_feed_params_splits_companies() {
        let params = ClientFeedParams {
            companies: "Acme, Globex ,,Initech".to_string(),
        };
        assert_eq!(params.company_names(), vec!["Acme", "Globex", "Initech"]);
    }

    #[test]
    fn test_error_serialization_shape() {
        let err = BlockCompanyError::AlreadyBlocked;
        assert_eq!(serde_json::to_value(&err).unwrap(), json!({"error": "already_blocked"}));

        let err = CreateMatchError::Unknown("boom".to_string());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"error": "unknown", "details": "boom"})
        );
    }
}
