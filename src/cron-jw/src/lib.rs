//! Periodic maintenance over the job store: purge expired deleted postings,
//! then check for new postings from known client companies.
//!
//! Both steps are independent; a failure in one is logged and the other
//! still runs. The service binary loops this on a poll interval.

use chrono::{Duration, Utc};

use data_model_jw::db::DbPool;
use data_model_jw::models::ScrapedJob;
use store_jw::purge_expired;
use store_jw::queries::recent_jobs_from_companies;

/// Window for "new jobs from clients" notifications.
pub const NOTIFICATION_WINDOW_HOURS: i64 = 24;

/// Where the list of client companies comes from. The shipped
/// implementation is a hardcoded stand-in; a real ATS integration plugs in
/// here.
pub trait ClientDirectorySource: Send + Sync {
    fn client_companies(&self) -> Vec<String>;
}

/// Placeholder directory with a fixed client list.
pub struct StaticClientDirectory;

impl ClientDirectorySource for StaticClientDirectory {
    fn client_companies(&self) -> Vec<String> {
        vec![
            "Acme".to_string(),
            "Globex".to_string(),
            "Initech".to_string(),
        ]
    }
}

/// What one maintenance pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaintenanceSummary {
    pub purged: usize,
    pub new_client_jobs: usize,
}

/// Runs one maintenance pass: purge, then the client-notification check.
pub async fn run_maintenance(pool: &DbPool, directory: &dyn ClientDirectorySource) -> MaintenanceSummary {
    let mut summary = MaintenanceSummary::default();

    match purge_expired(pool, Utc::now()).await {
        Ok(purged) => {
            summary.purged = purged;
        }
        Err(error) => {
            tracing::error!("[SKIP] Purge of expired postings failed: {}", error);
        }
    }

    let clients = directory.client_companies();
    tracing::info!("Checking for new postings from {} client companies", clients.len());

    let since = Utc::now() - Duration::hours(NOTIFICATION_WINDOW_HOURS);
    match recent_jobs_from_companies(pool, &clients, since).await {
        Ok(jobs) => {
            summary.new_client_jobs = jobs.len();
            report_new_client_jobs(&jobs);
        }
        Err(error) => {
            tracing::error!("[SKIP] Client-notification query failed: {}", error);
        }
    }

    summary
}

/// Logs each fresh client posting. A real notification channel (mail,
/// chat) would hang off this point.
fn report_new_client_jobs(jobs: &[ScrapedJob]) {
    if jobs.is_empty() {
        tracing::info!("No new postings from client companies in the last {}h", NOTIFICATION_WINDOW_HOURS);
        return;
    }

    tracing::info!("Found {} new postings from client companies:", jobs.len());
    for job in jobs {
        tracing::info!(
            "  - '{}' at '{}' ({})",
            job.title.as_deref().unwrap_or("<untitled>"),
            job.company_name.as_deref().unwrap_or("<unknown>"),
            job.job_url
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_directory_is_nonempty() {
        let clients = StaticClientDirectory.client_companies();
        assert!(!clients.is_empty());
        assert!(clients.contains(&"Acme".to_string()));
    }
}
