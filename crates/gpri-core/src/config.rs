//! Step inputs and repository URL parsing

use crate::error::{Error, Result};
use crate::types::{OtherTitlesMode, RepoSlug};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use std::time::Duration;

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Step configuration, borrowing from the parsed CLI arguments
#[derive(Clone)]
pub struct StepConfig<'a> {
    /// Basic-auth user
    pub github_username: Cow<'a, str>,
    /// Basic-auth token, never logged
    pub github_access_token: Cow<'a, str>,

    /// Commit whose merge event is looked up
    pub commit_sha: Cow<'a, str>,
    /// Remote URL ending in `:<owner>/<name>.git`
    pub repository_url: Cow<'a, str>,

    /// Whether the build runs for a pull request (logged only)
    pub is_pr: bool,
    /// Pull request id of the build (logged only)
    pub pull_request_id: Option<Cow<'a, str>>,

    /// REST API base URL
    pub api_url: Cow<'a, str>,
    /// Request timeout in seconds, must be non-zero
    pub timeout_seconds: u64,

    /// How non-matching events contribute to the other titles
    pub other_titles_mode: OtherTitlesMode,
    /// Treat a commit missing from the feed page as an error
    pub require_match: bool,
}

impl Default for StepConfig<'_> {
    fn default() -> Self {
        Self {
            github_username: Cow::Borrowed(""),
            github_access_token: Cow::Borrowed(""),
            commit_sha: Cow::Borrowed(""),
            repository_url: Cow::Borrowed(""),
            is_pr: false,
            pull_request_id: None,
            api_url: Cow::Borrowed(DEFAULT_API_URL),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            other_titles_mode: OtherTitlesMode::Documented,
            require_match: false,
        }
    }
}

impl std::fmt::Debug for StepConfig<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepConfig")
            .field("github_username", &self.github_username)
            .field("github_access_token", &"<redacted>")
            .field("commit_sha", &self.commit_sha)
            .field("repository_url", &self.repository_url)
            .field("is_pr", &self.is_pr)
            .field("pull_request_id", &self.pull_request_id)
            .field("api_url", &self.api_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("other_titles_mode", &self.other_titles_mode)
            .field("require_match", &self.require_match)
            .finish()
    }
}

impl StepConfig<'_> {
    /// Check that every required input is present and non-empty.
    ///
    /// Inputs are checked in a fixed order and the first missing one is
    /// reported.
    pub fn validate(&self) -> Result<()> {
        if self.github_username.is_empty() {
            return Err(Error::Config(
                "No App github_username provided as environment variable. Terminating..."
                    .to_string(),
            ));
        }
        if self.github_access_token.is_empty() {
            return Err(Error::Config(
                "No App github_access_token provided as environment variable. Terminating..."
                    .to_string(),
            ));
        }
        if self.commit_sha.is_empty() {
            return Err(Error::Config("commitSHA is empty!".to_string()));
        }
        if self.repository_url.is_empty() {
            return Err(Error::Config("repositoryURL is empty!".to_string()));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::Config(
                "HTTP timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout as a `Duration`
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Owner and name parsed from `repository_url`
    pub fn repository(&self) -> Result<RepoSlug> {
        parse_repository_url(&self.repository_url)
    }
}

fn repo_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Owner stops at the first '/' after the last ':'
    RE.get_or_init(|| Regex::new(r":([^:/]+)/([^/]+)\.git$").expect("static regex"))
}

/// Parse a repository URL ending in `:<owner>/<name>.git`.
///
/// ```
/// use gpri_core::config::parse_repository_url;
///
/// let slug = parse_repository_url("git@github.com:octocat/Hello-World.git").unwrap();
/// assert_eq!(slug.owner, "octocat");
/// assert_eq!(slug.name, "Hello-World");
/// ```
pub fn parse_repository_url(url: &str) -> Result<RepoSlug> {
    let caps = repo_url_regex().captures(url).ok_or_else(|| {
        Error::Config(format!(
            "This doesn't look like a github repository: {}",
            url
        ))
    })?;

    Ok(RepoSlug {
        owner: caps[1].to_string(),
        name: caps[2].to_string(),
    })
}
