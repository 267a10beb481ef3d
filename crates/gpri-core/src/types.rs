//! Core type definitions

use serde::Serialize;
use std::fmt;

/// Page size requested from the issue events endpoint
pub const FETCH_LIMIT: u32 = 30;

/// Event type kept by the fetcher
pub const MERGED_EVENT: &str = "merged";

/// A named tag on an issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Label name
    pub name: String,
}

/// The pull request a merge event belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Pull request number
    pub number: u64,
    /// Pull request title
    pub title: String,
    /// Labels, in API order
    pub labels: Vec<Label>,
}

/// Zero-valued issue returned when no merge event matches
pub(crate) static EMPTY_ISSUE: Issue = Issue {
    number: 0,
    title: String::new(),
    labels: Vec::new(),
};

impl Issue {
    /// Colon-joined label names in feed order, no trailing colon.
    pub fn label_names(&self) -> String {
        let mut buf = String::new();
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                buf.push(':');
            }
            buf.push_str(&label.name);
        }
        buf
    }
}

/// One "merged" record from the repository's issue events feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeEvent {
    /// Event id
    pub id: u64,
    /// Commit produced by the merge
    pub commit_id: String,
    /// Pull request that was merged
    pub issue: Issue,
}

/// Repository owner and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Source of the "other titles" lines written for non-matching events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OtherTitlesMode {
    /// Each non-matching event contributes the title matched so far
    #[default]
    Documented,
    /// Each non-matching event contributes its own title
    OwnTitles,
}

impl OtherTitlesMode {
    /// Parse from a step input value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "documented" => Some(Self::Documented),
            "own" | "own_titles" => Some(Self::OwnTitles),
            _ => None,
        }
    }
}

/// Result of correlating the merge events against the target commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correlation {
    /// Matched merge event, if any
    pub matched: Option<MergeEvent>,
    /// Newline-terminated title lines for the non-matching events
    pub other_titles: String,
}

impl Correlation {
    /// Matched issue, or the zero-valued issue when nothing matched
    pub fn issue(&self) -> &Issue {
        self.matched
            .as_ref()
            .map(|event| &event.issue)
            .unwrap_or(&EMPTY_ISSUE)
    }

    /// Whether a merge event matched the target commit
    #[inline]
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}
