//! The scrape-source collaborator seam and its HTTP implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use data_model_jw::models::RawJobPosting;

use crate::errors::Error;

/// Job boards a cycle can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Indeed,
    Linkedin,
}

impl Site {
    pub fn as_str(&self) -> &'static str {
        match self {
            Site::Indeed => "indeed",
            Site::Linkedin => "linkedin",
        }
    }

    /// LinkedIn queries go through the residential proxy; Indeed does not.
    pub fn needs_proxy(&self) -> bool {
        matches!(self, Site::Linkedin)
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A callable that fetches raw postings for one (site, term, location)
/// query. Any failure is recoverable: the cycle logs and skips the query.
#[async_trait]
pub trait ScrapeSource: Send + Sync {
    async fn fetch(
        &self,
        site: Site,
        search_term: &str,
        location: &str,
        results_wanted: u32,
    ) -> Result<Vec<RawJobPosting>, Error>;
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    site_name: &'a str,
    search_term: &'a str,
    location: &'a str,
    results_wanted: u32,
    country_indeed: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxies: Option<Vec<String>>,
}

/// HTTP client for a jobspy-style scrape service.
///
/// The service does the actual board scraping; this client only ships the
/// query and deserializes the posting list.
pub struct HttpScrapeClient {
    http: reqwest::Client,
    scrape_endpoint: Url,
    country: String,
    proxy_key: Option<String>,
}

impl HttpScrapeClient {
    pub fn new(base_url: &str, country: &str, proxy_key: Option<String>) -> Result<Self, Error> {
        let scrape_endpoint = Url::parse(base_url)?.join("scrape")?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(HttpScrapeClient {
            http,
            scrape_endpoint,
            country: country.to_string(),
            proxy_key,
        })
    }

    /// Builds the client from SCRAPER_API_BASE_URL (required),
    /// SCRAPE_COUNTRY (default "Netherlands"), and SCRAPERAPI_PROXY_KEY
    /// (optional; without it LinkedIn queries run unproxied and may fail).
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var("SCRAPER_API_BASE_URL")
            .map_err(|_| Error::MissingConfig("SCRAPER_API_BASE_URL".to_string()))?;
        let country = std::env::var("SCRAPE_COUNTRY").unwrap_or_else(|_| "Netherlands".to_string());
        let proxy_key = std::env::var("SCRAPERAPI_PROXY_KEY").ok().filter(|k| !k.is_empty());
        Self::new(&base_url, &country, proxy_key)
    }

    fn proxies_for(&self, site: Site) -> Option<Vec<String>> {
        if !site.needs_proxy() {
            return None;
        }
        match &self.proxy_key {
            Some(key) => Some(vec![format!(
                "http://scraperapi.country_code=nl:{}@proxy-server.scraperapi.com:8001",
                key
            )]),
            None => {
                tracing::warn!("No proxy key configured for {}; scraping may be blocked", site);
                None
            }
        }
    }
}

#[async_trait]
impl ScrapeSource for HttpScrapeClient {
    async fn fetch(
        &self,
        site: Site,
        search_term: &str,
        location: &str,
        results_wanted: u32,
    ) -> Result<Vec<RawJobPosting>, Error> {
        let request = ScrapeRequest {
            site_name: site.as_str(),
            search_term,
            location,
            results_wanted,
            country_indeed: &self.country,
            proxies: self.proxies_for(site),
        };

        let response = self
            .http
            .post(self.scrape_endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let postings: Vec<RawJobPosting> = response.error_for_status()?.json().await?;
        tracing::debug!(
            "[{}] '{}' in '{}': {} raw postings",
            site,
            search_term,
            location,
            postings.len()
        );
        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_wire_names() {
        assert_eq!(Site::Indeed.as_str(), "indeed");
        assert_eq!(Site::Linkedin.to_string(), "linkedin");
        assert!(Site::Linkedin.needs_proxy());
        assert!(!Site::Indeed.needs_proxy());
    }

    #[test]
    fn test_proxies_only_for_proxied_sites() {
        let client = HttpScrapeClient::new("http://localhost:8100/", "Netherlands", Some("secret".to_string())).unwrap();

        assert!(client.proxies_for(Site::Indeed).is_none());
        let proxies = client.proxies_for(Site::Linkedin).unwrap();
        assert_eq!(proxies.len(), 1);
        assert!(proxies[0].contains("secret"));

        let keyless = HttpScrapeClient::new("http://localhost:8100/", "Netherlands", None).unwrap();
        assert!(keyless.proxies_for(Site::Linkedin).is_none());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = HttpScrapeClient::new("not a url", "Netherlands", None);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
