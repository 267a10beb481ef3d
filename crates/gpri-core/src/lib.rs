//! # gpri core
//!
//! Find the pull request that produced a commit by reading the repository's
//! GitHub issue events feed, and compute the values a CI step exports for it.
//!
//! The pipeline is:
//! - **Fetch** one page (30 events, newest first) of `issues/events`
//! - **Decode** the JSON array element by element, keeping `"merged"` events
//! - **Correlate** the merge events against the target commit
//! - **Export** title, other titles, labels and number
//!
//! ## Example
//!
//! ```no_run
//! use gpri_core::{resolve_pull_request, StepConfig};
//! use std::borrow::Cow;
//!
//! # async fn example() -> gpri_core::Result<()> {
//! let config = StepConfig {
//!     github_username: Cow::Borrowed("octocat"),
//!     github_access_token: Cow::Borrowed("token"),
//!     commit_sha: Cow::Borrowed("6dcb09b5b57875f334f61aebed695e2e4193db5e"),
//!     repository_url: Cow::Borrowed("git@github.com:octocat/Hello-World.git"),
//!     ..Default::default()
//! };
//!
//! let correlation = resolve_pull_request(&config).await?;
//! println!("PR #{}: {}", correlation.issue().number, correlation.issue().title);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod coordination;
pub mod error;
pub mod http;
pub mod output;
pub mod traits;
pub mod types;

pub use config::StepConfig;
pub use error::{Error, ErrorKind, Result};
pub use output::PullRequestOutputs;
pub use types::{Correlation, Issue, Label, MergeEvent, OtherTitlesMode, RepoSlug};

/// Resolve the pull request behind `config.commit_sha`.
///
/// This is the main entry point for the library. It handles:
/// - Input validation
/// - Repository URL parsing
/// - The single issue events request
/// - Correlation against the target commit
///
/// Returns a zero-valued issue when the commit is not on the fetched page,
/// unless `config.require_match` is set.
pub async fn resolve_pull_request(config: &StepConfig<'_>) -> Result<Correlation> {
    config.validate()?;
    let repo = config.repository()?;
    let client = http::GitHubApiClient::from_config(config)?;

    coordination::resolve_with(
        &client,
        &repo,
        &config.commit_sha,
        config.other_titles_mode,
        config.require_match,
    )
    .await
}

/// Synchronous variant of `resolve_pull_request`
///
/// This creates a new Tokio runtime and blocks on the async version.
/// Prefer the async version if you're already in an async context.
pub fn resolve_pull_request_sync(config: &StepConfig<'_>) -> Result<Correlation> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?
        .block_on(resolve_pull_request(config))
}
