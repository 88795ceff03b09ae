use common_jw::{TimeUnit, get_db_pool, get_poll_interval, setup_logging};

use cron_jw::{StaticClientDirectory, run_maintenance};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file, if it exists
    dotenvy::dotenv().ok();

    setup_logging("cron_jw=debug");

    let pool = get_db_pool().await;

    let poll_interval = get_poll_interval(TimeUnit::Seconds, "MAINTENANCE_POLL_INTERVAL_S", 3600);
    tracing::info!(
        "Maintenance service started, running every {} seconds",
        poll_interval.as_secs()
    );

    let directory = StaticClientDirectory;

    // Maintenance polling loop
    loop {
        tracing::info!("Starting maintenance pass");

        let summary = run_maintenance(&pool, &directory).await;
        tracing::info!(
            "Maintenance pass done: {} postings purged, {} new client postings",
            summary.purged,
            summary.new_client_jobs
        );

        tracing::info!("Sleeping for {:?} until next pass", poll_interval);
        tokio::time::sleep(poll_interval).await;
    }
}
