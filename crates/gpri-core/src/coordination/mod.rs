//! Main coordination logic

pub mod correlator;

pub use correlator::{correlate, MergeCorrelator};

use crate::error::{Error, Result};
use crate::traits::MergeEventSource;
use crate::types::{Correlation, OtherTitlesMode, RepoSlug};

/// Fetch the merge events of `repo` and correlate them against `commit_sha`.
///
/// Shared by the library entry point and the CLI. With `require_match` set,
/// a commit that is not on the fetched page is an error instead of a
/// zero-valued result.
pub async fn resolve_with<S: MergeEventSource>(
    source: &S,
    repo: &RepoSlug,
    commit_sha: &str,
    mode: OtherTitlesMode,
    require_match: bool,
) -> Result<Correlation> {
    let events = source.fetch(repo).await?;
    let total = events.len();

    let correlation = MergeCorrelator::new(commit_sha)
        .with_mode(mode)
        .correlate(events);

    if !correlation.is_match() {
        tracing::debug!(
            commit = commit_sha,
            merge_events = total,
            "no merge event matches the commit"
        );
        if require_match {
            return Err(Error::NoMatch(format!(
                "commit {} is not among the {} most recent merge events of {}",
                commit_sha, total, repo
            )));
        }
    }

    Ok(correlation)
}
