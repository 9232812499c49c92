use std::fmt;
use std::fmt::{Display, Formatter};
use futures_util::{stream, StreamExt};
use tracing::{debug, error, info, warn};
use url::Url;
use crate::books::domain::Book;
use crate::core::domain::ScraperConfig;
use crate::core::library::{LibraryError, LibraryResult};
use crate::crawler::domain::model::{BookElement, FetchOutcome};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser;

// WebScraper fetches the listing page, then every candidate's detail page with at most
// `max_concurrent_fetches` requests in flight, and keeps the books it could build.
pub struct WebScraper {
    listing_url: String,
    base_url: Url,
    max_listing_items: usize,
    max_concurrent_fetches: usize,
    fetcher: Box<dyn PageFetcher>,
    books: Vec<Book>,
}

impl WebScraper {
    pub fn new(config: &ScraperConfig, fetcher: Box<dyn PageFetcher>) -> LibraryResult<Self> {
        Ok(Self {
            listing_url: config.listing_url.to_string(),
            base_url: Url::parse(config.base_url.as_str())?,
            max_listing_items: config.max_listing_items,
            max_concurrent_fetches: config.max_concurrent_fetches.max(1),
            fetcher,
            books: vec![],
        })
    }

    pub fn listing_url(&self) -> &str {
        self.listing_url.as_str()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Scrapes the listing page and its detail pages. A listing that cannot be fetched
    /// or read ends the scrape with no books; nothing is retried.
    pub async fn fetch_books(&mut self) -> Vec<Book> {
        let html = match self.fetcher.fetch(self.listing_url.as_str()).await {
            Ok(html) => html,
            Err(err) => {
                error!(url = self.listing_url.as_str(), error = %err, "failed to fetch listing page");
                self.books = vec![];
                return vec![];
            }
        };
        let elements = match parser::parse_listing(html.as_str(), self.max_listing_items) {
            Ok(elements) => elements,
            Err(err) => {
                error!(url = self.listing_url.as_str(), error = %err, "failed to parse listing page");
                self.books = vec![];
                return vec![];
            }
        };
        info!(url = self.listing_url.as_str(), candidates = elements.len(), "fetched listing page");
        self.books = self.parse_book_elements(&elements).await;
        info!(books = self.books.len(), candidates = elements.len(), "scrape finished");
        self.books.clone()
    }

    /// Fetches the detail page of every element and returns the books in element order.
    pub async fn parse_book_elements(&self, elements: &[BookElement]) -> Vec<Book> {
        self.fetch_outcomes(elements).await
            .into_iter()
            .filter_map(FetchOutcome::into_book)
            .collect()
    }

    /// Like `parse_book_elements` but keeps the outcome of every element, in element
    /// order, whatever order the requests complete in.
    pub async fn fetch_outcomes(&self, elements: &[BookElement]) -> Vec<FetchOutcome> {
        stream::iter(elements)
            .map(|element| self.fetch_book(element))
            .buffered(self.max_concurrent_fetches)
            .collect::<Vec<_>>()
            .await
    }

    async fn fetch_book(&self, element: &BookElement) -> FetchOutcome {
        let href = match element.href.as_deref() {
            Some(href) => href,
            None => {
                debug!(position = element.position, "book cover without link");
                return FetchOutcome::MissingLink;
            }
        };
        let url = match self.detail_url(href) {
            Ok(url) => url.to_string(),
            Err(err) => {
                warn!(href, error = %err, "cannot resolve book link");
                return FetchOutcome::ParseError { url: href.to_string(), error: err };
            }
        };
        let html = match self.fetcher.fetch(url.as_str()).await {
            Ok(html) => html,
            Err(err) => {
                warn!(url = url.as_str(), error = %err, "network error for book page");
                return FetchOutcome::NetworkError { url, error: err };
            }
        };
        match parser::parse_book_page(html.as_str()) {
            Ok(Some(book)) => {
                debug!(url = url.as_str(), isbn = book.isbn.as_str(), "parsed book page");
                FetchOutcome::Fetched(book)
            }
            Ok(None) => {
                warn!(url = url.as_str(), "book page without isbn");
                FetchOutcome::MissingIsbn { url }
            }
            Err(err) => {
                warn!(url = url.as_str(), error = %err, "parsing error for book page");
                FetchOutcome::ParseError { url, error: err }
            }
        }
    }

    // detail_url resolves a site relative link under the base url. Absolute links and
    // links that resolve to another origin are refused.
    fn detail_url(&self, href: &str) -> LibraryResult<Url> {
        if Url::parse(href).is_ok() {
            return Err(LibraryError::validation(format!("absolute book link {}", href).as_str()));
        }
        let url = self.base_url.join(href)?;
        if url.origin() != self.base_url.origin() {
            return Err(LibraryError::validation(
                format!("book link {} leaves {}", href, self.base_url).as_str()));
        }
        Ok(url)
    }
}

impl Display for WebScraper {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.books.is_empty() {
            return writeln!(f, "No books to display.");
        }
        for book in self.books.iter() {
            writeln!(f, "{}", book)?;
            writeln!(f, "{}", "-".repeat(50))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use async_trait::async_trait;
    use crate::core::domain::ScraperConfig;
    use crate::core::library::{LibraryError, LibraryResult};
    use crate::crawler::domain::model::{BookElement, FetchOutcome};
    use crate::crawler::domain::service::WebScraper;
    use crate::crawler::fetcher::http_fetcher::tests::{local_fetcher, serve, Route};
    use crate::crawler::fetcher::PageFetcher;

    const LISTING_URL: &str = "https://openlibrary.org/trending/forever";
    const BASE_URL: &str = "https://openlibrary.org";

    #[derive(Debug, Clone)]
    enum StubPage {
        Html { body: String, delay_ms: u64 },
        Unreachable,
    }

    #[derive(Debug, Default)]
    struct Counters {
        requests: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    struct StubFetcher {
        pages: HashMap<String, StubPage>,
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> LibraryResult<String> {
            self.counters.requests.fetch_add(1, Ordering::SeqCst);
            self.counters.urls.lock().expect("should lock").push(url.to_string());
            let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.counters.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let res = match self.pages.get(url) {
                Some(StubPage::Html { body, delay_ms }) => {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    Ok(body.clone())
                }
                Some(StubPage::Unreachable) => {
                    Err(LibraryError::timeout(format!("timed out {}", url).as_str()))
                }
                None => Err(LibraryError::not_found(format!("no page {}", url).as_str())),
            };
            self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
            res
        }
    }

    fn listing(count: usize) -> String {
        let covers: String = (0..count)
            .map(|i| format!(r#"<span class="bookcover"><a href="/works/OL{}W"><img/></a></span>"#, i))
            .collect();
        format!("<html><body>{}</body></html>", covers)
    }

    fn detail(i: usize, with_isbn: bool) -> String {
        let isbn = if with_isbn { format!(r#"<dd itemprop="isbn">978000000{:04}</dd>"#, i) } else { String::new() };
        format!(r#"<html><body><h1 itemprop="name">Book {}</h1>{}</body></html>"#, i, isbn)
    }

    fn detail_url(i: usize) -> String {
        format!("{}/works/OL{}W", BASE_URL, i)
    }

    fn build_scraper(pages: HashMap<String, StubPage>) -> (WebScraper, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let fetcher = StubFetcher { pages, counters: counters.clone() };
        let scraper = WebScraper::new(&ScraperConfig::default(), Box::new(fetcher)).expect("should build scraper");
        (scraper, counters)
    }

    fn page(body: String, delay_ms: u64) -> StubPage {
        StubPage::Html { body, delay_ms }
    }

    #[tokio::test]
    async fn test_should_return_empty_when_listing_unreachable() {
        let (mut scraper, counters) = build_scraper(HashMap::from([
            (LISTING_URL.to_string(), StubPage::Unreachable),
        ]));
        let books = scraper.fetch_books().await;
        assert!(books.is_empty());
        assert!(scraper.books().is_empty());
        assert_eq!(1, counters.requests.load(Ordering::SeqCst));
        assert_eq!("No books to display.\n", scraper.to_string());
    }

    #[tokio::test]
    async fn test_should_drop_items_without_isbn_in_order() {
        let missing = [2, 9, 15];
        let mut pages = HashMap::from([(LISTING_URL.to_string(), page(listing(20), 0))]);
        for i in 0..20 {
            pages.insert(detail_url(i), page(detail(i, !missing.contains(&i)), 0));
        }
        let (mut scraper, _) = build_scraper(pages);

        let books = scraper.fetch_books().await;
        assert_eq!(17, books.len());
        let expected: Vec<String> = (0..20).filter(|i| !missing.contains(i)).map(|i| format!("Book {}", i)).collect();
        let titles: Vec<String> = books.iter().map(|b| b.title.to_string()).collect();
        assert_eq!(expected, titles);
        assert_eq!(books, scraper.books().to_vec());
    }

    #[tokio::test]
    async fn test_should_cap_candidates() {
        let mut pages = HashMap::from([(LISTING_URL.to_string(), page(listing(30), 0))]);
        for i in 0..30 {
            pages.insert(detail_url(i), page(detail(i, true), 0));
        }
        let (mut scraper, counters) = build_scraper(pages);
        let books = scraper.fetch_books().await;
        assert_eq!(20, books.len());
        assert_eq!("Book 19", books[19].title.as_str());
        assert_eq!(21, counters.requests.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_should_preserve_order_regardless_of_completion() {
        let mut pages = HashMap::new();
        for i in 0..12 {
            // later items complete first
            pages.insert(detail_url(i), page(detail(i, true), (12 - i as u64) * 15));
        }
        let (scraper, _) = build_scraper(pages);
        let elements: Vec<BookElement> = (0..12)
            .map(|i| BookElement::new(i, Some(format!("/works/OL{}W", i).as_str())))
            .collect();
        let books = scraper.parse_book_elements(&elements).await;
        let titles: Vec<String> = books.iter().map(|b| b.title.to_string()).collect();
        let expected: Vec<String> = (0..12).map(|i| format!("Book {}", i)).collect();
        assert_eq!(expected, titles);
    }

    #[tokio::test]
    async fn test_should_bound_requests_in_flight() {
        let mut pages = HashMap::new();
        for i in 0..20 {
            pages.insert(detail_url(i), page(detail(i, true), 30));
        }
        let (scraper, counters) = build_scraper(pages);
        let elements: Vec<BookElement> = (0..20)
            .map(|i| BookElement::new(i, Some(format!("/works/OL{}W", i).as_str())))
            .collect();
        let books = scraper.parse_book_elements(&elements).await;
        assert_eq!(20, books.len());
        let max = counters.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 10, "max in flight {}", max);
        assert!(max > 1, "requests did not overlap");
    }

    #[tokio::test]
    async fn test_should_isolate_item_failures() {
        let mut pages = HashMap::new();
        pages.insert(detail_url(0), page(detail(0, true), 0));
        pages.insert(detail_url(1), StubPage::Unreachable);
        pages.insert(detail_url(3), page(detail(3, false), 0));
        pages.insert(detail_url(4), page(detail(4, true), 0));
        let (scraper, counters) = build_scraper(pages);
        let elements = vec![
            BookElement::new(0, Some("/works/OL0W")),
            BookElement::new(1, Some("/works/OL1W")),
            BookElement::new(2, None),
            BookElement::new(3, Some("/works/OL3W")),
            BookElement::new(4, Some("/works/OL4W")),
        ];
        let outcomes = scraper.fetch_outcomes(&elements).await;
        assert_eq!(5, outcomes.len());
        assert!(matches!(outcomes[0], FetchOutcome::Fetched(_)));
        assert!(matches!(outcomes[1], FetchOutcome::NetworkError { .. }));
        assert!(matches!(outcomes[2], FetchOutcome::MissingLink));
        assert!(matches!(outcomes[3], FetchOutcome::MissingIsbn { .. }));
        assert!(matches!(outcomes[4], FetchOutcome::Fetched(_)));
        // the element without a link is never requested
        assert_eq!(4, counters.requests.load(Ordering::SeqCst));

        let books = scraper.parse_book_elements(&elements).await;
        let isbns: Vec<&str> = books.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(vec!["9780000000000", "9780000000004"], isbns);
    }

    #[tokio::test]
    async fn test_should_only_request_links_under_base_url() {
        let mut pages = HashMap::new();
        pages.insert(detail_url(2), page(detail(2, true), 0));
        pages.insert("https://evil.example/works/OL1W".to_string(), page(detail(1, true), 0));
        pages.insert("https://evil.example/x".to_string(), page(detail(3, true), 0));
        let (scraper, counters) = build_scraper(pages);
        let elements = vec![
            BookElement::new(0, Some("//evil.example/works/OL1W")),
            BookElement::new(1, Some("https://evil.example/x")),
            BookElement::new(2, Some("/\\evil.example/works/OL1W")),
            BookElement::new(3, Some("https://openlibrary.org/works/OL2W")),
            BookElement::new(4, Some("works/OL2W")),
        ];
        let outcomes = scraper.fetch_outcomes(&elements).await;
        for outcome in &outcomes[..4] {
            assert!(matches!(outcome, FetchOutcome::ParseError { error: LibraryError::Validation { .. }, .. }), "{:?}", outcome);
        }
        assert!(matches!(outcomes[4], FetchOutcome::Fetched(_)));
        assert_eq!(vec![detail_url(2)], *counters.urls.lock().expect("should lock"));
    }

    #[tokio::test]
    async fn test_should_reject_invalid_base_url() {
        let config = ScraperConfig { base_url: "not a url".to_string(), ..ScraperConfig::default() };
        let fetcher = StubFetcher { pages: HashMap::new(), counters: Arc::new(Counters::default()) };
        assert!(WebScraper::new(&config, Box::new(fetcher)).is_err());
    }

    #[tokio::test]
    async fn test_should_format_books() {
        let mut pages = HashMap::from([(LISTING_URL.to_string(), page(listing(1), 0))]);
        pages.insert(detail_url(0), page(detail(0, true), 0));
        let (mut scraper, _) = build_scraper(pages);
        scraper.fetch_books().await;
        let out = scraper.to_string();
        assert!(out.starts_with("Book 0 by Unknown Author."));
        assert!(out.ends_with(format!("{}\n", "-".repeat(50)).as_str()));
    }

    #[tokio::test]
    async fn test_should_scrape_over_http() {
        let mut routes = HashMap::from([
            ("/trending/forever".to_string(), Route::Page(listing(4))),
            ("/works/OL0W".to_string(), Route::Page(detail(0, true))),
            ("/works/OL1W".to_string(), Route::Status(503)),
            ("/works/OL3W".to_string(), Route::Page(detail(3, true))),
        ]);
        routes.insert("/works/OL2W".to_string(), Route::Page(detail(2, false)));
        let base = serve(routes).await;
        let config = ScraperConfig {
            listing_url: format!("{}/trending/forever", base),
            base_url: base.to_string(),
            ..ScraperConfig::default()
        };
        let fetcher = local_fetcher(Duration::from_secs(5));
        let mut scraper = WebScraper::new(&config, Box::new(fetcher)).expect("should build scraper");
        let books = scraper.fetch_books().await;
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(vec!["Book 0", "Book 3"], titles);
    }

    #[tokio::test]
    async fn test_should_return_empty_when_listing_times_out() {
        let base = serve(HashMap::from([
            ("/trending/forever".to_string(), Route::Stall(Duration::from_secs(5))),
        ])).await;
        let config = ScraperConfig {
            listing_url: format!("{}/trending/forever", base),
            base_url: base.to_string(),
            ..ScraperConfig::default()
        };
        let fetcher = local_fetcher(Duration::from_secs(1));
        let mut scraper = WebScraper::new(&config, Box::new(fetcher)).expect("should build scraper");
        assert!(scraper.fetch_books().await.is_empty());
    }
}
