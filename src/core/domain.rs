use std::env;
use serde::Serialize;

// Identifiable defines common traits that can be shared by indexed records
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
}

pub const DEFAULT_LISTING_URL: &str = "https://openlibrary.org/trending/forever";
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

// ScraperConfig abstracts the knobs of the listing and detail page fetch
#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct ScraperConfig {
    pub listing_url: String,
    pub base_url: String,
    pub user_agent: String,
    pub max_listing_items: usize,
    pub max_concurrent_fetches: usize,
    pub request_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_listing_items: 20,
            max_concurrent_fetches: 10,
            request_timeout_secs: 20,
        }
    }
}

// Configuration abstracts config options for library system
#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct Configuration {
    pub library_name: String,
    pub book_loan_days: i64,
    pub scraper: ScraperConfig,
}

impl Configuration {
    pub fn new(library_name: &str) -> Self {
        Configuration {
            library_name: library_name.to_string(),
            book_loan_days: 15,
            scraper: ScraperConfig::default(),
        }
    }

    // from_env starts from the defaults and applies any PORTAL_* overrides; values that
    // do not parse are ignored.
    pub fn from_env(library_name: &str) -> Self {
        let mut config = Configuration::new(library_name);
        if let Ok(url) = env::var("PORTAL_LISTING_URL") {
            config.scraper.listing_url = url;
        }
        if let Ok(url) = env::var("PORTAL_BASE_URL") {
            config.scraper.base_url = url;
        }
        if let Some(max) = env_number("PORTAL_MAX_ITEMS") {
            config.scraper.max_listing_items = max as usize;
        }
        if let Some(max) = env_number("PORTAL_MAX_CONCURRENCY") {
            config.scraper.max_concurrent_fetches = (max as usize).max(1);
        }
        if let Some(secs) = env_number("PORTAL_TIMEOUT_SECS") {
            config.scraper.request_timeout_secs = secs;
        }
        config
    }
}

fn env_number(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|val| val.trim().parse::<u64>().ok())
}
