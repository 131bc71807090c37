//! Paginated pull-request listing with on-disk cache.

use std::path::Path;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use dredge_core::fs_util::atomic_write;

use crate::client::GithubClient;
use crate::error::GithubError;
use crate::rate_limit::{RateLimitTracker, remaining_quota};
use crate::repo::RepoSlug;

/// Filename of the cached pull-request collection.
pub const CACHE_FILENAME: &str = "pulls.json";

/// Page size requested from the listing endpoint.
const PAGE_SIZE: &str = "100";

/// Author block of a pull request record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestAuthor {
    /// Login of the account that opened the pull request.
    pub login: String,
}

/// One pull request record from the listing endpoint.
///
/// Immutable once fetched; the fields mirror the API response and are
/// never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Repository-scoped pull request number.
    pub number: u64,
    /// When the pull request was opened.
    pub created_at: DateTime<Utc>,
    /// Pull request title.
    pub title: String,
    /// Account that opened the pull request.
    pub user: PullRequestAuthor,
    /// API URL of the pull request, used for the diff fetch.
    pub url: String,
}

/// Fetches the complete closed pull-request collection for `slug`.
///
/// When a non-empty cache file exists at `cache_path` its parsed contents
/// are returned without any network call: the collection is treated as
/// permanently complete once fully retrieved. Otherwise the listing
/// endpoint is paged through (100 records per page, closed state only),
/// following the `Link` header's `rel="next"` relation until absent, and
/// the accumulated collection is written to the cache exactly once, after
/// the final page.
///
/// Any non-success page status aborts with [`GithubError::Api`] and
/// writes no partial cache. The remaining-quota counter from each page is
/// recorded into `tracker` for the diff fetcher's reporting.
pub async fn fetch_all(
    client: &GithubClient,
    slug: &RepoSlug,
    cache_path: &Path,
    tracker: &mut RateLimitTracker,
) -> Result<Vec<PullRequest>, GithubError> {
    if let Some(cached) = read_cache(cache_path)? {
        info!(count = cached.len(), "loaded pull request collection from cache");
        return Ok(cached);
    }

    let mut pulls: Vec<PullRequest> = Vec::new();
    let mut request = client
        .get(&client.pulls_url(slug))
        .query(&[("per_page", PAGE_SIZE), ("state", "closed")]);

    loop {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Api {
                status: status.as_u16(),
            });
        }

        if let Some(remaining) = remaining_quota(response.headers()) {
            tracker.reset(remaining);
        }
        let next = next_page_url(response.headers());

        let page: Vec<PullRequest> = response.json().await?;
        pulls.extend(page);
        info!(count = pulls.len(), "pull requests retrieved");

        match next {
            Some(url) => request = client.get(&url),
            None => break,
        }
    }

    write_cache(cache_path, &pulls)?;
    info!("pull request collection complete; subsequent runs read it from the cache");

    Ok(pulls)
}

/// Returns the cached collection, or `None` when the cache file is absent
/// or empty.
fn read_cache(path: &Path) -> Result<Option<Vec<PullRequest>>, GithubError> {
    match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(GithubError::Cache {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(meta) if meta.len() == 0 => return Ok(None),
        Ok(_) => {}
    }

    let content = std::fs::read_to_string(path).map_err(|source| GithubError::Cache {
        path: path.to_path_buf(),
        source,
    })?;

    let pulls = serde_json::from_str(&content).map_err(|source| GithubError::CacheFormat {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(pulls))
}

fn write_cache(path: &Path, pulls: &[PullRequest]) -> Result<(), GithubError> {
    let content = serde_json::to_string(pulls).map_err(|source| GithubError::CacheFormat {
        path: path.to_path_buf(),
        source,
    })?;

    atomic_write(path, &content).map_err(|source| GithubError::Cache {
        path: path.to_path_buf(),
        source,
    })
}

/// Extracts the `rel="next"` URL from a `Link` response header, if any.
fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(reqwest::header::LINK)?.to_str().ok()?;

    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.contains(r#"rel="next""#) {
            return None;
        }
        let target = target.trim();
        Some(target.strip_prefix('<')?.strip_suffix('>')?.to_string())
    })
}
