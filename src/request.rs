use std::time::Duration;

use reqwest::Client;

use crate::{warn_time, Result, USER_AGENT};

/// Anything that can turn a URL into the body of a page.
///
/// The scraper only ever awaits one request at a time, so implementors don't need to be `Send`.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn get(&self, url: &str) -> Result<String>;
}

/// Plain HTTP fetcher. `Client` uses Arc internally so this is cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?.error_for_status()?;
        let body = res.text().await?;
        Ok(body)
    }
}

/// Requests a page and returns its body.
/// A failed request is logged and turns into an empty page, which parses to "no data".
pub(crate) async fn request_page<F: Fetch>(fetcher: &F, url: &str) -> String {
    match fetcher.get(url).await {
        Ok(body) => body,
        Err(e) => {
            warn_time!("*** Error opening url '{}' *** {}", url, e);
            String::new()
        }
    }
}
