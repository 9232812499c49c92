pub mod http_fetcher;

use async_trait::async_trait;
use crate::core::library::LibraryResult;

// PageFetcher retrieves the body of a page. Implementations must be safe to call from
// several in-flight requests at once.
#[async_trait]
pub trait PageFetcher: Sync + Send {
    async fn fetch(&self, url: &str) -> LibraryResult<String>;
}
