/// REST client for the roulette result feed
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::types::RawGame;

/// Source of the most recent game results, newest first
pub trait ResultFeed: Send + Sync {
    fn fetch_latest(&self) -> impl Future<Output = Result<Vec<RawGame>>> + Send;
}

/// Client for the public Blaze "recent roulette games" endpoint
pub struct BlazeClient {
    client: Client,
    url: String,
}

impl BlazeClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(BlazeClient { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ResultFeed for BlazeClient {
    async fn fetch_latest(&self) -> Result<Vec<RawGame>> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let games = parse_feed_response(status, &body)?;

        debug!("Feed returned {} games", games.len());
        Ok(games)
    }
}

/// Map an HTTP status and body to raw games. A non-2xx status or a body
/// that is not a JSON array of records is `FeedUnavailable`.
pub fn parse_feed_response(status: StatusCode, body: &str) -> Result<Vec<RawGame>> {
    if !status.is_success() {
        return Err(TrackerError::FeedUnavailable(format!(
            "Feed returned HTTP {}",
            status
        )));
    }

    serde_json::from_str(body)
        .map_err(|e| TrackerError::FeedUnavailable(format!("Unexpected payload: {}", e)))
}
