//! HTTP client for GitHub API

pub mod client;
pub mod feed;

pub use client::GitHubApiClient;
pub use feed::decode_merge_events;
