//! Repository slug parsing and cache locations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::GithubError;

/// Expected prefix of a repository web URL.
const WEB_URL_PREFIX: &str = "https://github.com/";

/// Separator between owner and repository in cache directory names.
const CACHE_DIR_SEPARATOR: &str = "#_#";

/// Owner and repository name parsed from a GitHub web URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    owner: String,
    repo: String,
}

impl RepoSlug {
    /// Parses a repository web URL of the form
    /// `https://github.com/<owner>/<repo>`.
    ///
    /// Trailing path segments (e.g. `/pulls`) are ignored. Segments that
    /// are not plain names (empty, `.` or `..`, or containing characters
    /// outside `[A-Za-z0-9._-]`) are rejected.
    pub fn parse(url: &str) -> Result<Self, GithubError> {
        let invalid = || GithubError::InvalidRepoUrl { url: url.to_string() };

        let rest = url.strip_prefix(WEB_URL_PREFIX).ok_or_else(invalid)?;
        let mut segments = rest.split('/');
        let owner = segments.next().filter(|s| is_valid_segment(s)).ok_or_else(invalid)?;
        let repo = segments.next().filter(|s| is_valid_segment(s)).ok_or_else(invalid)?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Repository owner login.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Per-repository cache directory under `root`.
    ///
    /// The directory holds the pull-request collection cache and the
    /// checkpoint log for this repository.
    #[must_use]
    pub fn cache_dir(&self, root: &Path) -> PathBuf {
        root.join(format!("{}{CACHE_DIR_SEPARATOR}{}", self.owner, self.repo))
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

fn is_valid_segment(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_repository_url() {
        let slug = RepoSlug::parse("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(slug.owner(), "rust-lang");
        assert_eq!(slug.repo(), "cargo");
    }

    #[test]
    fn parse_ignores_trailing_path_segments() {
        let slug = RepoSlug::parse("https://github.com/acme/widgets/pulls?page=2").unwrap();
        assert_eq!(slug.owner(), "acme");
        assert_eq!(slug.repo(), "widgets");
    }

    #[test]
    fn parse_accepts_dots_and_dashes_in_names() {
        let slug = RepoSlug::parse("https://github.com/my-org/my.repo-v2").unwrap();
        assert_eq!(slug.repo(), "my.repo-v2");
    }

    #[test]
    fn parse_rejects_non_https_github_urls() {
        assert!(RepoSlug::parse("http://github.com/a/b").is_err());
        assert!(RepoSlug::parse("https://gitlab.com/a/b").is_err());
        assert!(RepoSlug::parse("github.com/a/b").is_err());
    }

    #[test]
    fn parse_rejects_missing_repository_segment() {
        assert!(RepoSlug::parse("https://github.com/onlyowner").is_err());
        assert!(RepoSlug::parse("https://github.com/owner/").is_err());
        assert!(RepoSlug::parse("https://github.com/").is_err());
    }

    #[test]
    fn parse_rejects_path_traversal_segments() {
        assert!(RepoSlug::parse("https://github.com/../etc").is_err());
        assert!(RepoSlug::parse("https://github.com/owner/..").is_err());
        assert!(RepoSlug::parse("https://github.com/owner/.").is_err());
    }

    #[test]
    fn parse_rejects_segments_with_unexpected_characters() {
        assert!(RepoSlug::parse("https://github.com/ow ner/repo").is_err());
        assert!(RepoSlug::parse("https://github.com/owner/re%70o").is_err());
    }

    #[test]
    fn cache_dir_joins_owner_and_repo_with_separator() {
        let slug = RepoSlug::parse("https://github.com/acme/widgets").unwrap();
        let dir = slug.cache_dir(Path::new("/tmp/dredge"));
        assert_eq!(dir, Path::new("/tmp/dredge/acme#_#widgets"));
    }

    #[test]
    fn display_formats_as_owner_slash_repo() {
        let slug = RepoSlug::parse("https://github.com/acme/widgets").unwrap();
        assert_eq!(slug.to_string(), "acme/widgets");
    }
}
