//! Per-PR diff retrieval with rate-limit backoff.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::client::GithubClient;
use crate::error::GithubError;
use crate::rate_limit::{RateLimitTracker, remaining_quota};

/// Accept header value negotiating diff-formatted content.
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.diff";

/// Fixed backoff before retrying a rate-limited request: one hour and ten
/// seconds, so the retry lands just after the hourly quota window resets.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(3610);

/// Outcome of a diff fetch that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResponse {
    /// The raw unified-diff text of the pull request.
    Diff(String),
    /// The diff is unavailable (deleted or inaccessible pull request).
    /// Callers must not checkpoint the pull request on this outcome.
    Unavailable,
}

/// Retry budget for rate-limited diff requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum request attempts before giving up.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Default number of attempts per diff request.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Retrieves one pull request's diff.
///
/// Sends a GET with diff content negotiation and the client's
/// authorization header. A 200 returns the raw body and feeds the
/// remaining-quota counter into `tracker`, logging it once per hundred
/// consumed requests. A 403 whose quota header reads zero is transient:
/// the fetcher logs the resume time, sleeps the fixed
/// `RATE_LIMIT_BACKOFF`, and retries the identical request, up to the
/// policy's attempt budget; exhausting the budget yields
/// [`GithubError::RateLimitExhausted`]. A 404 yields
/// [`DiffResponse::Unavailable`]; any other non-success status is fatal.
pub async fn fetch(
    client: &GithubClient,
    url: &str,
    tracker: &mut RateLimitTracker,
    retry: RetryPolicy,
) -> Result<DiffResponse, GithubError> {
    for attempt in 1..=retry.max_attempts {
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, DIFF_MEDIA_TYPE)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {
                if let Some(report) = remaining_quota(response.headers()).and_then(|r| tracker.observe(r)) {
                    info!(remaining = report, "rate limit quota");
                }
                return Ok(DiffResponse::Diff(response.text().await?));
            }
            403 if quota_exhausted(response.headers()) => {
                if attempt == retry.max_attempts {
                    break;
                }
                let resume = Utc::now() + RATE_LIMIT_BACKOFF;
                warn!(
                    "rate limit exceeded, scan resumes automatically at {}",
                    resume.format("%Y-%m-%d %H:%M:%S UTC")
                );
                tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
            }
            404 => return Ok(DiffResponse::Unavailable),
            status => return Err(GithubError::Api { status }),
        }
    }

    Err(GithubError::RateLimitExhausted {
        attempts: retry.max_attempts,
    })
}

fn quota_exhausted(headers: &reqwest::header::HeaderMap) -> bool {
    remaining_quota(headers) == Some(0)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const DIFF_BODY: &str = "diff --git a/a.txt b/a.txt\n";

    fn rate_limited() -> ResponseTemplate {
        ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0")
    }

    async fn fetch_from(server: &MockServer, diff_path: &str, retry: RetryPolicy) -> Result<DiffResponse, GithubError> {
        let client = GithubClient::new(&server.uri(), None).unwrap();
        let mut tracker = RateLimitTracker::new();
        fetch(&client, &format!("{}{diff_path}", server.uri()), &mut tracker, retry).await
    }

    #[tokio::test]
    async fn fetch_returns_diff_body_on_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/10"))
            .and(header("Accept", DIFF_MEDIA_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_string(DIFF_BODY))
            .mount(&server)
            .await;

        let result = fetch_from(&server, "/repos/acme/widgets/pulls/10", RetryPolicy::default()).await;

        assert_eq!(result.unwrap(), DiffResponse::Diff(DIFF_BODY.to_string()));
    }

    #[tokio::test]
    async fn fetch_sends_authorization_header_when_token_configured() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/10"))
            .and(header("Authorization", "token s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DIFF_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClient::new(&server.uri(), Some("s3cret".to_string())).unwrap();
        let mut tracker = RateLimitTracker::new();
        let url = format!("{}/repos/acme/widgets/pulls/10", server.uri());

        let result = fetch(&client, &url, &mut tracker, RetryPolicy::default()).await;
        assert!(matches!(result, Ok(DiffResponse::Diff(_))));
    }

    #[tokio::test]
    async fn fetch_returns_unavailable_for_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/12"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = fetch_from(&server, "/repos/acme/widgets/pulls/12", RetryPolicy::default()).await;

        assert_eq!(result.unwrap(), DiffResponse::Unavailable);
    }

    #[tokio::test]
    async fn fetch_fails_fast_on_unexpected_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/10"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let result = fetch_from(&server, "/repos/acme/widgets/pulls/10", RetryPolicy::default()).await;

        assert!(matches!(result, Err(GithubError::Api { status: 500 })));
    }

    #[tokio::test]
    async fn fetch_treats_plain_forbidden_as_fatal() {
        let server = MockServer::start().await;

        // 403 without an exhausted quota header is not a rate limit.
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/10"))
            .respond_with(ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "4000"))
            .mount(&server)
            .await;

        let result = fetch_from(&server, "/repos/acme/widgets/pulls/10", RetryPolicy::default()).await;

        assert!(matches!(result, Err(GithubError::Api { status: 403 })));
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_retries_after_rate_limit_and_returns_post_retry_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/10"))
            .respond_with(rate_limited())
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/10"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DIFF_BODY))
            .mount(&server)
            .await;

        // The paused clock auto-advances through the backoff sleep.
        let result = fetch_from(&server, "/repos/acme/widgets/pulls/10", RetryPolicy::default()).await;

        assert_eq!(result.unwrap(), DiffResponse::Diff(DIFF_BODY.to_string()));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_gives_up_after_retry_budget_is_exhausted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/10"))
            .respond_with(rate_limited())
            .mount(&server)
            .await;

        let retry = RetryPolicy { max_attempts: 3 };
        let result = fetch_from(&server, "/repos/acme/widgets/pulls/10", retry).await;

        assert!(matches!(result, Err(GithubError::RateLimitExhausted { attempts: 3 })));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }
}
