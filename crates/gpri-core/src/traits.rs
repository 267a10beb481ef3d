//! GATs trait definitions for the merge event source

use crate::error::Result;
use crate::http::GitHubApiClient;
use crate::types::{MergeEvent, RepoSlug};
use futures::future::BoxFuture;
use std::future::Future;

/// Source of a repository's recent merge events, newest first.
///
/// The future type is a GAT so test doubles can return ready futures
/// without boxing.
pub trait MergeEventSource {
    /// GAT for the async fetch
    type FetchFuture<'a>: Future<Output = Result<Vec<MergeEvent>>> + Send + 'a
    where
        Self: 'a;

    /// Fetch one bounded page of merge events for `repo`
    fn fetch<'a>(&'a self, repo: &'a RepoSlug) -> Self::FetchFuture<'a>;
}

impl MergeEventSource for GitHubApiClient {
    type FetchFuture<'a> = BoxFuture<'a, Result<Vec<MergeEvent>>>;

    fn fetch<'a>(&'a self, repo: &'a RepoSlug) -> Self::FetchFuture<'a> {
        Box::pin(self.fetch_merge_events(repo))
    }
}
