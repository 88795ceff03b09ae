//! Cycle configuration: the keyword file and the scrape parameters.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::source::Site;

pub const DEFAULT_KEYWORDS_FILE: &str = "keywords.json";

/// The (search term x location) grid driving one cycle, read from a JSON
/// file. A missing or malformed file is the fatal configuration error: the
/// cycle aborts before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordsFile {
    pub locations: Vec<String>,
    pub job_titles: Vec<String>,
}

impl KeywordsFile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        let keywords = serde_json::from_str(&raw)?;
        Ok(keywords)
    }

    /// Every (location, title) pair, locations outermost.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.locations
            .iter()
            .flat_map(|loc| self.job_titles.iter().map(move |title| (loc.as_str(), title.as_str())))
    }
}

/// Everything a scrape cycle needs besides the pool and the source.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    pub sites: Vec<Site>,
    pub results_wanted: u32,
    pub keywords_file: PathBuf,
    /// Randomized delay range (seconds) between consecutive source queries.
    pub throttle_seconds: (f64, f64),
}

impl Default for CycleConfig {
    fn default() -> Self {
        CycleConfig {
            sites: vec![Site::Indeed, Site::Linkedin],
            results_wanted: 25,
            keywords_file: PathBuf::from(DEFAULT_KEYWORDS_FILE),
            throttle_seconds: (10.0, 20.0),
        }
    }
}

impl CycleConfig {
    /// Reads KEYWORDS_FILE, keeping the defaults for everything else.
    pub fn from_env() -> Self {
        let keywords_file = std::env::var("KEYWORDS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_KEYWORDS_FILE));
        CycleConfig {
            keywords_file,
            ..CycleConfig::default()
        }
    }
}
