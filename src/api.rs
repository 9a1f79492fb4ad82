//! HTTP client for the leaderboard API and the replay host
//!
//! One [`ApiClient`] is shared by the whole run; `reqwest::Client` pools
//! connections internally, so clones are cheap and share the pool.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::{LeaderboardInfo, LeaderboardScores, Page};
use reqwest::header::{CONTENT_LENGTH, RANGE};
use serde::de::DeserializeOwned;

/// Client for listing leaderboards, listing scores and downloading replays
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
    scores_per_leaderboard: u32,
}

impl ApiClient {
    /// Create a client from API settings
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            scores_per_leaderboard: config.scores_per_leaderboard,
        })
    }

    /// Leaderboards requested per listing page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// URL of one page of the ranked leaderboard listing
    pub fn leaderboards_url(&self, page: u32) -> String {
        format!(
            "{}/leaderboards?leaderboardContext=nomods&page={}&count={}&type=ranked&sortBy=playcount&order=desc&allTypes=0&allRequirements=0",
            self.base_url, page, self.page_size
        )
    }

    /// URL of a leaderboard's score list
    ///
    /// `sortBy=rank&order=desc` is what the upstream tooling has always requested.
    pub fn leaderboard_scores_url(&self, leaderboard_id: &str) -> String {
        format!(
            "{}/leaderboard/scores/{}?leaderboardContext=nomods&page=1&sortBy=rank&order=desc&count={}",
            self.base_url,
            encode_path_segment(leaderboard_id),
            self.scores_per_leaderboard
        )
    }

    /// Fetch one page of ranked leaderboards
    pub async fn fetch_leaderboards_page(&self, page: u32) -> Result<Page<LeaderboardInfo>> {
        self.get_json(&self.leaderboards_url(page)).await
    }

    /// Fetch the score list of one leaderboard
    pub async fn fetch_leaderboard_scores(&self, leaderboard_id: &str) -> Result<LeaderboardScores> {
        self.get_json(&self.leaderboard_scores_url(leaderboard_id))
            .await
    }

    /// Fetch a byte range of a replay
    ///
    /// `range` is a full header value such as `bytes=100-500`. Servers that ignore
    /// the header answer `200` with the whole file; the body is returned either way.
    pub async fn fetch_replay_range(&self, url: &str, range: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).header(RANGE, range).send().await?;
        read_body(response, url).await
    }

    /// Fetch a whole replay file
    pub async fn fetch_replay(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;
        read_body(response, url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Drain a response body into memory after checking its status
async fn read_body(mut response: reqwest::Response, url: &str) -> Result<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let expected = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = Vec::with_capacity(expected.min(MAX_PREALLOCATION));
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
    }

    tracing::trace!(url = %url, status = status.as_u16(), bytes = body.len(), "replay body received");
    Ok(body)
}

/// Upper bound on trusting a Content-Length header for preallocation
const MAX_PREALLOCATION: usize = 64 * 1024 * 1024;

/// Percent-encode a single path segment
fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
