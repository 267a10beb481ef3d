//! Exported values computed from a correlation

use crate::types::Correlation;

/// Matched pull request title
pub const ENV_PULL_REQUEST_TITLE: &str = "GPRI_PULL_REQUEST_TITLE";
/// Newline-joined titles collected for the other merges
pub const ENV_OTHER_PULL_REQUEST_TITLES: &str = "GPRI_OTHER_PULL_REQUEST_TITLES";
/// Colon-joined label names
pub const ENV_PULL_REQUEST_LABELS: &str = "GPRI_PULL_REQUEST_LABELS";
/// Matched pull request number
pub const ENV_PULL_REQUEST_NUMBER: &str = "GPRI_PULL_REQUEST_NUMBER";

/// The four exported values, in export order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestOutputs {
    /// Matched title, empty when nothing matched
    pub title: String,
    /// Other titles accumulator
    pub other_titles: String,
    /// Colon-joined label names
    pub labels: String,
    /// Decimal number, "0" when nothing matched
    pub number: String,
}

impl PullRequestOutputs {
    /// Compute the exported values
    pub fn from_correlation(correlation: &Correlation) -> Self {
        let issue = correlation.issue();
        Self {
            title: issue.title.clone(),
            other_titles: correlation.other_titles.clone(),
            labels: issue.label_names(),
            number: issue.number.to_string(),
        }
    }

    /// Key/value pairs in the order they are exported
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (ENV_PULL_REQUEST_TITLE, self.title.as_str()),
            (ENV_OTHER_PULL_REQUEST_TITLES, self.other_titles.as_str()),
            (ENV_PULL_REQUEST_LABELS, self.labels.as_str()),
            (ENV_PULL_REQUEST_NUMBER, self.number.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, Label, MergeEvent};

    #[test]
    fn test_unmatched_outputs_are_zero_values() {
        let correlation = Correlation {
            matched: None,
            other_titles: "\n\n".to_string(),
        };
        let outputs = PullRequestOutputs::from_correlation(&correlation);
        assert_eq!(outputs.title, "");
        assert_eq!(outputs.labels, "");
        assert_eq!(outputs.number, "0");
        assert_eq!(outputs.other_titles, "\n\n");
    }

    #[test]
    fn test_matched_outputs() {
        let correlation = Correlation {
            matched: Some(MergeEvent {
                id: 1,
                commit_id: "abc".into(),
                issue: Issue {
                    number: 1234,
                    title: "Add dark mode".into(),
                    labels: vec![
                        Label {
                            name: "feature".into(),
                        },
                        Label { name: "ui".into() },
                    ],
                },
            }),
            other_titles: String::new(),
        };
        let outputs = PullRequestOutputs::from_correlation(&correlation);
        assert_eq!(outputs.title, "Add dark mode");
        assert_eq!(outputs.labels, "feature:ui");
        assert_eq!(outputs.number, "1234");
    }

    #[test]
    fn test_entries_order() {
        let keys: Vec<&str> = PullRequestOutputs::default()
            .entries()
            .iter()
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(
            keys,
            vec![
                "GPRI_PULL_REQUEST_TITLE",
                "GPRI_OTHER_PULL_REQUEST_TITLES",
                "GPRI_PULL_REQUEST_LABELS",
                "GPRI_PULL_REQUEST_NUMBER",
            ]
        );
    }
}
