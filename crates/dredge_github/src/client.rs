//! Shared HTTP client for GitHub API requests.

use std::time::Duration;

use crate::USER_AGENT;
use crate::error::GithubError;
use crate::repo::RepoSlug;

/// Default GitHub API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout for all API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client carrying the optional access token and API base URL.
///
/// One client is shared by the listing and diff fetchers so both send the
/// same authorization header. The base URL is configurable for GitHub
/// Enterprise installations.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Creates a client for `api_url`, authenticating with `token` when given.
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// URL of the pull-request listing endpoint for `slug`.
    #[must_use]
    pub fn pulls_url(&self, slug: &RepoSlug) -> String {
        format!("{}/repos/{}/{}/pulls", self.api_url, slug.owner(), slug.repo())
    }

    /// Starts a GET request with the client's authorization header applied.
    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, format!("token {token}")),
            None => request,
        }
    }
}
