//! Incremental decoder for the issue events feed
//!
//! The response body is walked as a JSON array one element at a time: each
//! element is decoded, checked against the `"merged"` event type and either
//! kept or dropped before the next element is read. A malformed element
//! aborts the walk at that element.

use crate::error::{Error, Result};
use crate::types::{Issue, Label, MergeEvent, FETCH_LIMIT, MERGED_EVENT};
use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

const NOT_AN_ARRAY: &str = "response not an array";

/// GitHub API issue event object
#[derive(Debug, Deserialize)]
struct GitHubIssueEvent {
    #[serde(default)]
    id: u64,
    /// Event type ("merged", "closed", "referenced", ...)
    #[serde(default)]
    event: String,
    /// Null for events that carry no commit
    #[serde(default)]
    commit_id: Option<String>,
    #[serde(default)]
    issue: Option<GitHubIssue>,
}

#[derive(Debug, Default, Deserialize)]
struct GitHubIssue {
    #[serde(default)]
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
}

#[derive(Debug, Deserialize)]
struct GitHubLabel {
    #[serde(default)]
    name: String,
}

impl From<GitHubIssueEvent> for MergeEvent {
    fn from(raw: GitHubIssueEvent) -> Self {
        let issue = raw.issue.unwrap_or_default();
        MergeEvent {
            id: raw.id,
            commit_id: raw.commit_id.unwrap_or_default(),
            issue: Issue {
                number: issue.number,
                title: issue.title,
                labels: issue
                    .labels
                    .into_iter()
                    .map(|label| Label { name: label.name })
                    .collect(),
            },
        }
    }
}

/// Sequence visitor that keeps merge events and drops everything else
struct MergedEvents;

impl<'de> Visitor<'de> for MergedEvents {
    type Value = Vec<MergeEvent>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of issue events")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut events = Vec::with_capacity(FETCH_LIMIT as usize);
        let mut seen = 0usize;

        while let Some(raw) = seq.next_element::<GitHubIssueEvent>()? {
            seen += 1;
            if raw.event == MERGED_EVENT {
                events.push(raw.into());
            }
        }

        tracing::debug!(seen, kept = events.len(), "decoded issue events");
        Ok(events)
    }
}

/// Decode an issue events response body, keeping only merge events.
///
/// Order is preserved. A body whose first token is not `[` fails with
/// "response not an array"; any decode failure inside the array fails with
/// the underlying parser message.
pub fn decode_merge_events(body: &[u8]) -> Result<Vec<MergeEvent>> {
    if let Some(first) = body.iter().find(|b| !b.is_ascii_whitespace()) {
        if *first != b'[' {
            return Err(Error::Payload(format!(
                "Failed to parse github events: {}",
                NOT_AN_ARRAY
            )));
        }
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let events = (&mut de).deserialize_seq(MergedEvents)?;
    de.end()?;
    Ok(events)
}

/// GitHub API error body
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Extract the `message` field of a GitHub error body, if there is one.
pub fn api_error_message(body: &[u8]) -> Option<String> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return None;
    }
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
}
