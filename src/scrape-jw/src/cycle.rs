//! One scrape-and-reconcile cycle.
//!
//! A cycle is bounded by the timestamp captured before any fetching starts.
//! Per-query failures are logged and skipped; a fatal error aborts the
//! remaining fetches. The sweep that reconciles unseen postings runs in the
//! cleanup path either way, so statuses stay consistent on partial cycles.

use std::collections::HashSet;

use chrono::Utc;
use rand::Rng;

use data_model_jw::db::DbPool;
use data_model_jw::models::RawJobPosting;
use store_jw::blocklist::blocked_company_names;
use store_jw::{sweep_unseen, upsert_batch};

use crate::config::{CycleConfig, KeywordsFile};
use crate::errors::Error;
use crate::source::ScrapeSource;

/// Counters reported at the end of a cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub queries_attempted: usize,
    pub queries_failed: usize,
    pub rows_written: usize,
    pub rows_swept: usize,
    /// True when a fatal error stopped the fetch loop early.
    pub aborted: bool,
}

/// Drops postings repeating an earlier (title, company, location) triple,
/// keeping the first occurrence.
pub fn dedup_postings(postings: Vec<RawJobPosting>) -> Vec<RawJobPosting> {
    let mut seen = HashSet::new();
    postings
        .into_iter()
        .filter(|p| seen.insert((p.title.clone(), p.company_name.clone(), p.location.clone())))
        .collect()
}

/// Drops postings whose company is on the blocklist. Postings without a
/// company name pass through.
pub fn filter_blocked(postings: Vec<RawJobPosting>, blocked: &[String]) -> Vec<RawJobPosting> {
    postings
        .into_iter()
        .filter(|p| match &p.company_name {
            Some(company) => !blocked.iter().any(|b| b == company),
            None => true,
        })
        .collect()
}

fn throttle_delay(range: (f64, f64)) -> Option<std::time::Duration> {
    let (min, max) = range;
    if max <= 0.0 {
        return None;
    }
    let seconds = if min < max {
        rand::thread_rng().gen_range(min..max)
    } else {
        max
    };
    Some(std::time::Duration::from_secs_f64(seconds))
}

/// Runs one full scrape cycle: every configured site against every
/// (location x search-term) pair, then the reconciliation sweep.
///
/// The keyword file is loaded before the cycle starts; failing to load it is
/// the one error that prevents the sweep (nothing was scraped, nothing may
/// be reconciled). Every later failure still ends with the sweep running
/// against the captured cycle start.
pub async fn run_cycle<S: ScrapeSource>(pool: &DbPool, source: &S, config: &CycleConfig) -> Result<CycleOutcome, Error> {
    let keywords = KeywordsFile::load(&config.keywords_file)?;

    let cycle_started_at = Utc::now();
    tracing::info!(
        "Starting scrape cycle at {} ({} sites, {} locations, {} titles)",
        cycle_started_at,
        config.sites.len(),
        keywords.locations.len(),
        keywords.job_titles.len()
    );

    let mut outcome = CycleOutcome::default();

    let fetch_result: Result<(), Error> = run_fetch_phase(pool, source, config, &keywords, &mut outcome).await;

    if let Err(error) = &fetch_result {
        tracing::error!("Scrape cycle aborted mid-way: {}", error);
        outcome.aborted = true;
    }

    // Cleanup path: reconcile statuses whether or not the fetch loop
    // completed, so postings that vanished from the boards do not stay
    // online after a partial cycle.
    match sweep_unseen(pool, cycle_started_at).await {
        Ok(swept) => outcome.rows_swept = swept,
        Err(error) => {
            tracing::error!("[SKIP] Reconciliation sweep failed: {}", error);
        }
    }

    tracing::info!(
        "Scrape cycle finished: {}/{} queries ok, {} rows written, {} swept{}",
        outcome.queries_attempted - outcome.queries_failed,
        outcome.queries_attempted,
        outcome.rows_written,
        outcome.rows_swept,
        if outcome.aborted { " (aborted)" } else { "" }
    );
    Ok(outcome)
}

async fn run_fetch_phase<S: ScrapeSource>(
    pool: &DbPool,
    source: &S,
    config: &CycleConfig,
    keywords: &KeywordsFile,
    outcome: &mut CycleOutcome,
) -> Result<(), Error> {
    // One blocklist snapshot per cycle
    let blocked = blocked_company_names(pool).await?;
    tracing::info!("Excluding {} blocked companies", blocked.len());

    for site in &config.sites {
        for (location, title) in keywords.pairs() {
            outcome.queries_attempted += 1;

            // Exact-phrase search, the way the boards expect it
            let search_term = format!("\"{}\"", title);

            match source.fetch(*site, &search_term, location, config.results_wanted).await {
                Ok(postings) if postings.is_empty() => {
                    tracing::debug!("[{}] '{}' in '{}': no results", site, title, location);
                }
                Ok(postings) => {
                    let postings = filter_blocked(dedup_postings(postings), &blocked);
                    if postings.is_empty() {
                        tracing::debug!(
                            "[{}] '{}' in '{}': nothing left after dedup/blocklist",
                            site,
                            title,
                            location
                        );
                    } else {
                        match upsert_batch(pool, postings, Utc::now()).await {
                            Ok(written) => {
                                outcome.rows_written += written;
                                tracing::info!("[{}] '{}' in '{}': {} rows written", site, title, location, written);
                            }
                            Err(error) => {
                                // Batch rolled back; the cycle moves on to the next query
                                outcome.queries_failed += 1;
                                tracing::error!(
                                    "[SKIP] Failed to persist batch for [{}] '{}' in '{}': {}",
                                    site,
                                    title,
                                    location,
                                    error
                                );
                            }
                        }
                    }
                }
                Err(error) => {
                    outcome.queries_failed += 1;
                    tracing::error!("[SKIP] Query failed [{}] '{}' in '{}': {}", site, title, location, error);
                }
            }

            if let Some(delay) = throttle_delay(config.throttle_seconds) {
                tracing::debug!("Throttling {:.1}s before next query", delay.as_secs_f64());
                tokio::time::sleep(delay).await;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str, company: &str, location: &str) -> RawJobPosting {
        RawJobPosting {
            job_url: format!("https://jobs.example.com/{}-{}", title, company),
            title: Some(title.to_string()),
            company_name: Some(company.to_string()),
            location: Some(location.to_string()),
            description: None,
            job_type: None,
            source: Some("indeed".to_string()),
            posted_at: None,
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut first = posting("Engineer", "Acme", "Utrecht");
        first.description = Some("first".to_string());
        let mut dup = posting("Engineer", "Acme", "Utrecht");
        dup.description = Some("second".to_string());

        let result = dedup_postings(vec![first, dup, posting("Engineer", "Acme", "Amsterdam")]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].description.as_deref(), Some("first"));
    }

    #[test]
    fn test_dedup_treats_missing_fields_as_equal() {
        let mut a = posting("Engineer", "Acme", "Utrecht");
        a.company_name = None;
        let mut b = posting("Engineer", "Acme", "Utrecht");
        b.company_name = None;

        let result = dedup_postings(vec![a, b]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_filter_blocked_drops_blocklisted_companies() {
        let blocked = vec!["Spammy Recruiters BV".to_string()];
        let mut anonymous = posting("Engineer", "x", "Utrecht");
        anonymous.company_name = None;

        let result = filter_blocked(
            vec![
                posting("Engineer", "Acme", "Utrecht"),
                posting("Engineer", "Spammy Recruiters BV", "Utrecht"),
                anonymous,
            ],
            &blocked,
        );

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|p| p.company_name.as_deref() != Some("Spammy Recruiters BV")));
    }

    #[test]
    fn test_throttle_delay_disabled_for_zero_range() {
        assert!(throttle_delay((0.0, 0.0)).is_none());

        let delay = throttle_delay((10.0, 20.0)).unwrap();
        assert!(delay.as_secs_f64() >= 10.0 && delay.as_secs_f64() < 20.0);
    }
}
