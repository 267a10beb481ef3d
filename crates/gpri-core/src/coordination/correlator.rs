//! Merge event correlation
//!
//! Locates the merge event produced by a target commit and builds the
//! "other titles" report for the rest of the page.

use crate::types::{Correlation, MergeEvent, OtherTitlesMode};

/// Correlates a newest-first merge event sequence against one commit
#[derive(Debug, Clone, Copy)]
pub struct MergeCorrelator<'a> {
    target_commit: &'a str,
    mode: OtherTitlesMode,
}

impl<'a> MergeCorrelator<'a> {
    /// Create a correlator using the documented accumulation mode
    pub fn new(target_commit: &'a str) -> Self {
        Self {
            target_commit,
            mode: OtherTitlesMode::Documented,
        }
    }

    /// Select how non-matching events contribute to the other titles
    pub fn with_mode(mut self, mode: OtherTitlesMode) -> Self {
        self.mode = mode;
        self
    }

    /// Correlate the events, consuming them.
    ///
    /// Algorithm (two phases over the given order):
    /// 1. Record every position whose `commit_id` equals the target. The last
    ///    one is the match.
    /// 2. Walk the events again. Each non-matching event appends one line
    ///    ending in `\n`:
    ///    - `Documented`: the title of the latest match at or before this
    ///      position, empty if none has been seen yet
    ///    - `OwnTitles`: the event's own title
    pub fn correlate(&self, events: Vec<MergeEvent>) -> Correlation {
        let match_positions: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.commit_id == self.target_commit)
            .map(|(i, _)| i)
            .collect();

        let mut other_titles = String::new();
        let mut pending = match_positions.iter().copied().peekable();
        let mut current: Option<usize> = None;

        for (i, event) in events.iter().enumerate() {
            if pending.peek() == Some(&i) {
                pending.next();
                current = Some(i);
                continue;
            }

            let title = match self.mode {
                OtherTitlesMode::Documented => current
                    .map(|m| events[m].issue.title.as_str())
                    .unwrap_or(""),
                OtherTitlesMode::OwnTitles => event.issue.title.as_str(),
            };
            other_titles.push_str(title);
            other_titles.push('\n');
        }

        let matched = match_positions
            .last()
            .and_then(|&m| events.into_iter().nth(m));

        Correlation {
            matched,
            other_titles,
        }
    }
}

/// Correlate with the documented accumulation mode
pub fn correlate(events: Vec<MergeEvent>, target_commit: &str) -> Correlation {
    MergeCorrelator::new(target_commit).correlate(events)
}
