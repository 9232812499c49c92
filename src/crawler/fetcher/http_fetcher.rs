use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use crate::core::library::LibraryResult;
use crate::crawler::fetcher::PageFetcher;

// HttpPageFetcher shares one reqwest client, and with it the connection pool, across all
// requests of a scrape.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub(crate) fn new(user_agent: &str, timeout: Duration) -> LibraryResult<Self> {
        let client = client_builder(user_agent, timeout).build()?;
        Ok(Self::with_client(client))
    }

    pub(crate) fn with_client(client: Client) -> Self {
        Self {
            client,
        }
    }
}

fn client_builder(user_agent: &str, timeout: Duration) -> ClientBuilder {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> LibraryResult<String> {
        debug!(url, "fetching page");
        let res = self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.text().await?)
    }
}
