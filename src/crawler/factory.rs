use std::time::Duration;
use crate::core::domain::ScraperConfig;
use crate::core::library::LibraryResult;
use crate::crawler::domain::WebScraper;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::fetcher::http_fetcher::HttpPageFetcher;

pub fn create_page_fetcher(config: &ScraperConfig) -> LibraryResult<Box<dyn PageFetcher>> {
    let fetcher = HttpPageFetcher::new(
        config.user_agent.as_str(), Duration::from_secs(config.request_timeout_secs))?;
    Ok(Box::new(fetcher))
}

pub fn create_scraper(config: &ScraperConfig) -> LibraryResult<WebScraper> {
    let fetcher = create_page_fetcher(config)?;
    WebScraper::new(config, fetcher)
}
